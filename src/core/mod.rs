pub mod cache;
pub mod diff;
pub mod file_list;
pub mod hasher;
pub mod ignore;
pub mod listing;
pub mod matcher;
pub mod scanner;
