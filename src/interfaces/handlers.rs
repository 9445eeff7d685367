pub mod assets;
pub mod forms;
pub mod home;
pub mod resolver;
pub mod system;
