//! Marker-prefixed status lines.
//!
//! `[+]` progress that worked, `[*]` work in progress, `[-]` a negative result,
//! `[!]` an error or interruption (stderr), `[i]` a hint for the operator.

use console::style;

const BANNER: &str = r"
                     _      _
 __   __ ___  _ __  | |__  | | _   _   ___  ____
 \ \ / // _ \| '_ \ | '_ \ | || | | | / _ \|_  /
  \ V /|  __/| | | || |_) || || |_| ||  __/ / /
   \_/  \___||_| |_||_.__/ |_| \__,_| \___|/___|
";

pub fn banner() {
    println!("{}", style(BANNER).cyan());
}

pub fn success(msg: impl AsRef<str>) {
    println!("{} {}", style("[+]").green().bold(), msg.as_ref());
}

pub fn working(msg: impl AsRef<str>) {
    println!("{} {}", style("[*]").cyan().bold(), msg.as_ref());
}

pub fn negative(msg: impl AsRef<str>) {
    println!("{} {}", style("[-]").red().bold(), msg.as_ref());
}

pub fn alert(msg: impl AsRef<str>) {
    eprintln!("{} {}", style("[!]").yellow().bold(), msg.as_ref());
}

pub fn hint(msg: impl AsRef<str>) {
    println!("{} {}", style("[i]").blue().bold(), msg.as_ref());
}

/// Indented continuation line under the previous marker.
pub fn detail(msg: impl AsRef<str>) {
    for line in msg.as_ref().lines() {
        println!("    {line}");
    }
}
