pub mod alarm;
pub mod appsettings;
pub mod console;
pub mod controller;
pub mod notification;
pub mod scheduling;
pub mod storage;

#[cfg(test)]
mod test_utils;
