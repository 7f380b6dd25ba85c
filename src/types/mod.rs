pub mod db;
pub mod dto;
pub mod enums;
pub mod internal;
