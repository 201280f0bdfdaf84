#[cfg(test)]
mod test;

mod cmd;
mod digest;
mod error;
mod filemode;
mod interface;
mod kind;
mod lock;
mod object;
mod repo;
mod signature;

use color_eyre::eyre::{eyre, Context};
pub use color_eyre::Result;

use crate::interface::*;
use crate::repo::Repo;

use camino::Utf8PathBuf;
use clap::Parser;
use once_cell::sync::Lazy;
use tracing_subscriber::prelude::*;

static ARGS: Lazy<Opt> = Lazy::new(Opt::parse);

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    Lazy::force(&ARGS);

    let path = match ARGS.path {
        Some(ref path) => path
            .canonicalize_utf8()
            .wrap_err(format!("Directory not found: '{path}'"))?,
        None => Utf8PathBuf::try_from(std::env::current_dir()?)?.canonicalize_utf8()?,
    };

    match &ARGS.command {
        Command::Init => {
            let repo = Repo::init(&path)?;
            println!("Initialized empty repository in {}", repo.git_dir());
        }
        Command::HashObject {
            kind,
            write,
            stdin,
            file,
        } => cmd::hash_object::handle(&path, *kind, *write, *stdin, file.as_deref())?,
        Command::CatFile {
            pretty,
            show_kind,
            args,
        } => cmd::cat_file::handle(&Repo::discover(&path)?, *pretty, *show_kind, args)?,
        Command::CommitTree {
            tree,
            parents,
            message,
        } => {
            let repo = Repo::discover(&path)?;
            let oid =
                cmd::commit_tree::commit_tree(&repo, tree, parents, message, cmd::identity(&ARGS))?;
            println!("{oid:x}");
        }
        Command::UpdateRef {
            reference,
            new_value,
        } => cmd::refs::update_ref(&Repo::discover(&path)?, reference, new_value)?,
        Command::SymbolicRef { name, reference } => {
            cmd::refs::symbolic_ref(&Repo::discover(&path)?, name, reference.as_deref())?
        }
        Command::Tag {
            name,
            object,
            annotate,
            message,
        } => {
            if *annotate && message.is_none() {
                return Err(eyre!("An annotated tag needs a message (-m)"));
            }
            let repo = Repo::discover(&path)?;
            cmd::tag::create_tag(&repo, name, object, message.as_deref(), cmd::identity(&ARGS))?;
        }
        Command::Log { revision } => cmd::log::handle(&Repo::discover(&path)?, revision)?,
    }
    Ok(())
}
