use std::fs;
use std::io;
use std::path::Path;

use clap::CommandFactory;

// cli.rs only needs clap and clap_complete, both build-dependencies.
#[path = "src/cli.rs"]
mod cli;

const MANUAL: &str = "RemoteDAQ Manual";

fn main() -> io::Result<()> {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = std::env::var_os("OUT_DIR")
        .ok_or_else(|| io::Error::other("OUT_DIR not set by Cargo"))?;
    let man_dir = Path::new(&out_dir).join("man");
    fs::create_dir_all(&man_dir)?;

    // One page per visible command, named `remotedaq-nodes-watch.1` etc.
    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let name = cmd.get_name().to_owned();
        pending.extend(
            cmd.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .map(|sub| sub.clone().name(format!("{name}-{}", sub.get_name()))),
        );
        write_page(cmd, &man_dir.join(format!("{name}.1")))?;
    }
    Ok(())
}

fn write_page(cmd: clap::Command, path: &Path) -> io::Result<()> {
    let mut buf = Vec::new();
    clap_mangen::Man::new(cmd)
        .manual(MANUAL)
        .source(concat!("remotedaq ", env!("CARGO_PKG_VERSION")))
        .render(&mut buf)?;
    fs::write(path, buf)
}
