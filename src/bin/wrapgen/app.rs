use std::path::PathBuf;

use clap::Parser;

/// wrapgen - generate typed packet wrapper classes from compiled message
/// classes and protocol documentation
#[derive(Debug, Parser)]
#[command(name = "wrapgen", version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the compiled .class files (searched recursively).
    #[arg(long, value_name = "DIR")]
    pub classes: PathBuf,

    /// Packet catalog file: one `protocol direction id name class` line per packet.
    #[arg(long, value_name = "FILE")]
    pub catalog: PathBuf,

    /// Protocol documentation page (HTML).
    #[arg(long, value_name = "FILE")]
    pub docs: PathBuf,

    /// Directory the generated sources are written to.
    #[arg(short, long, value_name = "DIR", default_value = "Packets")]
    pub output: PathBuf,

    /// Package the generated classes are emitted into.
    #[arg(long, value_name = "PACKAGE", default_value = "com.comphenix.packetwrapper")]
    pub package: String,

    /// Internal-name prefix of the obfuscated server classes.
    #[arg(long, value_name = "PREFIX", default_value = "net/minecraft/server")]
    pub server_package: String,

    /// Obfuscated name of the packet write method.
    #[arg(long, value_name = "NAME", default_value = "b")]
    pub write_method: String,

    /// Only generate packets whose name contains this substring.
    #[arg(long, value_name = "NAME")]
    pub filter: Option<String>,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    pub verbose: bool,
}
