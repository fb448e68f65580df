pub mod observer;
pub mod timeline;
