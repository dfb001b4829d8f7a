pub mod imu;
pub mod oled;
