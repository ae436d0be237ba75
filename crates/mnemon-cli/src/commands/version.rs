use anyhow::Result;

pub fn run() -> Result<()> {
    println!("mnemon {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
