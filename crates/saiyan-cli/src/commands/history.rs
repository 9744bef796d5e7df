use saiyan_core::session::DateGroup;
use saiyan_core::{Database, Session};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let session = Session::load(&db)?;
    let history = session.snapshot().history;

    println!(
        "Training Logs History (Total {} entries)",
        history.training_total
    );
    print_groups(&history.training);

    println!("Ki Logs History (Total {} entries)", history.ki_total);
    print_groups(&history.ki);

    println!("Supplement Logs");
    print_groups(&history.supplements);

    Ok(())
}

fn print_groups(groups: &[DateGroup]) {
    for group in groups {
        println!("  {}", group.date);
        for (i, entry) in group.entries.iter().enumerate() {
            println!("    {}. {}", i + 1, entry);
        }
    }
    println!();
}
