use anyhow::Result;
use nsfs::namespace::BindMode;
use nsfs::provider::{one_file, os};
use nsfs::NameSpace;
use std::fs;
use std::io::Read;

fn write_tree(root: &std::path::Path, rel: &str, content: &[u8]) -> Result<()> {
    let full = root.join(rel);
    fs::create_dir_all(full.parent().unwrap())?;
    fs::write(full, content)?;
    Ok(())
}

fn main() -> Result<()> {
    let root = std::path::Path::new("/tmp/nsfs-demo/dogs");
    let a = root.join("A");
    let b = root.join("B");
    let c = root.join("C");
    write_tree(&a, "animals/dogs/dogs", b"A-dogs-content")?;
    write_tree(&a, "animals/dogs/A-dogs", b"only in A")?;
    write_tree(&b, "animals/dogs/dogs", b"B-dogs-content")?;
    write_tree(&b, "animals/dogs/B-dogs", b"only in B")?;
    write_tree(&c, "animals/cats/cats", b"fake dog content")?;

    let ns = NameSpace::new();
    ns.bind("/dogs", os(a.join("animals/dogs")), "/", BindMode::After);
    ns.bind("/dogs", os(b.join("animals/dogs")), "/", BindMode::After);
    ns.bind("/dogs", one_file(c.join("animals/cats/cats"), "fake-dog"), "/", BindMode::Before);

    println!("{ns}");

    for entry in ns.read_dir("/dogs")? {
        println!("{} {}", if entry.is_dir() { "d" } else { "-" }, entry.name());
    }

    let mut buf = String::new();
    ns.open("/dogs/dogs")?.read_to_string(&mut buf)?;
    println!("/dogs/dogs -> {buf:?}");

    Ok(())
}
