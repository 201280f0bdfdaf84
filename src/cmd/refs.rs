use color_eyre::eyre::eyre;

use crate::repo::refs::RefValue;
use crate::repo::Repo;
use crate::Result;

pub fn update_ref(repo: &Repo, reference: &str, new_value: &str) -> Result<()> {
    let oid = repo.resolve_revision(new_value)?;
    if !repo.database.exists(&oid) {
        return Err(eyre!("Cannot point {reference} at missing object {oid}"));
    }
    repo.update_ref(reference, &oid)
}

/// Print the target of `name`, or point it at `target` when one is given.
pub fn symbolic_ref(repo: &Repo, name: &str, target: Option<&str>) -> Result<()> {
    if let Some(target) = target {
        return repo.set_symbolic_ref(name, target);
    }

    match repo.read_ref(name)? {
        Some(RefValue::Symbolic(target)) => {
            println!("{target}");
            Ok(())
        }
        Some(RefValue::Direct(_)) => Err(eyre!("ref {name} is not a symbolic ref")),
        None => Err(eyre!("No such ref: {name}")),
    }
}
