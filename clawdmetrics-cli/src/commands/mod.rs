pub mod exchange;
pub mod stats;
pub mod verify;

use clawdmetrics_core::display::rule;

/// Usage text printed after an argument error.
#[derive(Debug, Clone, Copy)]
pub struct Usage {
    pub usage: &'static str,
    pub example: &'static str,
    pub env_vars: &'static [&'static str],
}

impl Usage {
    pub fn print(&self) {
        eprintln!("\nUsage:");
        eprintln!("  {}", self.usage);
        eprintln!("\nExample:");
        eprintln!("  {}", self.example);
        if !self.env_vars.is_empty() {
            eprintln!("\nEnvironment Variables Required:");
            for var in self.env_vars {
                eprintln!("  {}", var);
            }
        }
    }
}

/// Titled block framed by rules, each line indented.
pub fn print_block(title: &str, lines: &[String]) {
    println!("\n{}", title);
    println!("   {}", rule());
    for line in lines {
        println!("   {}", line);
    }
    println!("   {}", rule());
}

pub fn banner(title: &str) {
    println!("{}", title);
    println!("{}", "=".repeat(60));
}
