//! List rules command implementation.

use strata_rules::built_in_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<32} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(90));

    for rule in built_in_rules() {
        let descriptor = rule.descriptor();
        println!(
            "{:<8} {:<32} {:<9} {}",
            descriptor.code, descriptor.name, descriptor.severity, descriptor.title
        );
    }

    println!("\nHidden rules feed the test generator and never appear in check output.");
    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  strata check --rules uninitialized-readonly-field");
    println!("  strata check --rules SL103,SL300");
}
