use std::cell::RefCell;
use std::process;

use flagtree::{run_env, CommandBuilder, Flag};

fn is_ip(literal: &str) -> Result<(), String> {
    let octets: Vec<&str> = literal.split('.').collect();

    if octets.len() == 4 && octets.iter().all(|octet| octet.parse::<u8>().is_ok()) {
        Ok(())
    } else {
        Err(format!("invalid IP: {literal}"))
    }
}

fn main() {
    let ip = RefCell::new(String::default());
    let count = RefCell::new(0usize);

    let command = CommandBuilder::new("ping")
        .about("Send echo requests to a host.")
        .flag(Flag::string(&ip, "ip", "127.0.0.1", "IP Address to ping.").validate(is_ip))
        .flag(Flag::uint(&count, "count", 4, "Requests to send.").short('c'))
        .handler(|_| {
            for sequence in 0..*count.borrow() {
                println!("ping: {} seq={sequence}", ip.borrow());
            }
            0
        });

    process::exit(run_env(command));
}
