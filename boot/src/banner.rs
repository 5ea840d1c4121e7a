use hmacgate_drivers::console_println;

use crate::config::HMAC_SECRET;

const BANNER: &str = r#"
        .--------.
       / .------. \
      / /        \ \
      | |        | |
     _| |________| |_
   .' |_|        |_| '.
   '._____ ____ _____.'
   |     .'____'.     |
   '.__.'.'    '.'.__.'
   '.__  | HMAC |  __.'
   |   '.'.____.'.'   |
   '.____'.____.'____.'"#;

pub fn print_banner() {
    console_println!("{}", BANNER);
    console_println!("\n           = hmacgate v{} =\n", env!("CARGO_PKG_VERSION"));
    if cfg!(feature = "announce-key") {
        console_println!("# HMAC key: \"{}\"\n", HMAC_SECRET);
    }
}
