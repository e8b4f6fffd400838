pub mod c_stuffs;
pub mod misc;
