use anyhow::Result;
use nsfs::namespace::BindMode;
use nsfs::{provider, NameSpace};
use std::fs;
use std::path::Path;

fn setup_directories() -> Result<()> {
    fs::create_dir_all("/tmp/nsfs-demo/source")?;
    fs::create_dir_all("/tmp/nsfs-demo/target")?;
    fs::write("/tmp/nsfs-demo/source/file1.txt", "from source")?;
    fs::write("/tmp/nsfs-demo/target/file2.txt", "from target")?;
    Ok(())
}

fn main() -> Result<()> {
    setup_directories()?;

    let ns = NameSpace::new();
    ns.bind(
        "/mnt",
        provider::safe_os(Path::new("/tmp/nsfs-demo/target"))?,
        "/",
        BindMode::Replace,
    );

    // BindMode::Replace: truncates the stack at /mnt first, so only the
    // new binding's contents are visible afterward.
    println!("Binding with BindMode::Replace");
    ns.bind(
        "/mnt",
        provider::safe_os(Path::new("/tmp/nsfs-demo/source"))?,
        "/",
        BindMode::Replace,
    );

    for entry in ns.read_dir("/mnt")? {
        println!("{} {}", if entry.is_dir() { "d" } else { "-" }, entry.name());
    }

    Ok(())
}
