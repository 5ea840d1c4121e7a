#![cfg_attr(target_os = "none", no_std, no_main)]

#[cfg(target_os = "none")]
mod firmware;

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!(
        "firmware: build with --target armv5te-none-eabi and run under qemu-system-arm -M versatilepb"
    );
}
