//! Hash command handler

use sc4lua::{file_name_hash, hashed_file_name};

/// Output line for one name
pub fn format_hash(name: &str, file_name: bool) -> String {
    if file_name {
        hashed_file_name(name)
    } else {
        format!("The hash of '{}' is: 0x{:08X}", name, file_name_hash(name))
    }
}

pub fn handle(names: &[String], file_name: bool) {
    for name in names {
        println!("{}", format_hash(name, file_name));
    }
}
