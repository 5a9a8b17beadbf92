pub mod artist;
pub mod available_time;
pub mod show;
pub mod venue;
