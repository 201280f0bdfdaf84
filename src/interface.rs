use camino::Utf8PathBuf;
use clap::Parser;
use clap::Subcommand;

use crate::kind::ObjectKind;

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Create an empty repository in the working directory
    Init,

    /// Compute the digest of a file, optionally writing it to the object store
    HashObject {
        /// Kind of object to create; the content is validated against it
        #[clap(short = 't', long = "type", default_value = "blob")]
        kind: ObjectKind,

        /// Write the object into the object store
        #[clap(short, long)]
        write: bool,

        /// Read the content from standard input instead of a file
        #[clap(long, conflicts_with = "file")]
        stdin: bool,

        #[clap(required_unless_present = "stdin")]
        file: Option<Utf8PathBuf>,
    },

    /// Print an object: `cat-file <kind> <object>`, `cat-file -p <object>` or
    /// `cat-file -t <object>`
    CatFile {
        /// Pretty-print the contents of the object based on its kind
        #[clap(short = 'p', conflicts_with = "show_kind")]
        pretty: bool,

        /// Print the kind of the object
        #[clap(short = 't')]
        show_kind: bool,

        #[clap(value_name = "ARGS", required = true, num_args = 1..=2)]
        args: Vec<String>,
    },

    /// Write a commit object for a tree
    CommitTree {
        tree: String,

        #[clap(short = 'p', value_name = "PARENT")]
        parents: Vec<String>,

        #[clap(short, long)]
        message: String,
    },

    /// Point a ref at an object
    UpdateRef {
        #[clap(value_name = "REF")]
        reference: String,

        #[clap(value_name = "NEW_VALUE")]
        new_value: String,
    },

    /// Read a symbolic ref, or point it at another ref
    SymbolicRef {
        name: String,

        #[clap(value_name = "REF")]
        reference: Option<String>,
    },

    /// Create a lightweight or annotated tag
    Tag {
        name: String,

        #[clap(default_value = "HEAD")]
        object: String,

        /// Create an annotated tag object
        #[clap(short, long)]
        annotate: bool,

        /// Tag message; implies --annotate
        #[clap(short, long)]
        message: Option<String>,
    },

    /// Show the first-parent history of a revision
    Log {
        #[clap(default_value = "HEAD")]
        revision: String,
    },
}

#[derive(Debug, Parser)]
#[clap(name = "gob", version)]
pub struct Opt {
    #[clap(subcommand)]
    pub command: Command,

    /// Run as if started in this directory.
    #[clap(short = 'C')]
    pub path: Option<Utf8PathBuf>,

    /// Name recorded on new commits and tags.
    #[clap(long, env = "GOB_AUTHOR_NAME", global = true)]
    pub author_name: Option<String>,

    /// Email recorded on new commits and tags.
    #[clap(long, env = "GOB_AUTHOR_EMAIL", global = true)]
    pub author_email: Option<String>,
}
