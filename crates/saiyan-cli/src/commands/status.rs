use saiyan_core::{Database, Session};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let session = Session::load(&db)?;
    let snap = session.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
        return Ok(());
    }

    println!("Level {} -- {}", snap.level, snap.form);
    println!("Power Level: {} total mins | Ki: {}/100", snap.power_level, snap.ki);
    for line in &snap.categories {
        println!(
            "  {:<11} {:>6} / {:<6} level {} ({:.0}%)",
            line.category.label(),
            line.current.min(line.goal),
            line.goal,
            line.level,
            line.percent
        );
    }
    Ok(())
}
