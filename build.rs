fn main() -> Result<(), Box<dyn std::error::Error>> {
	use vergen_gitcl::{CargoBuilder, Emitter, GitclBuilder};

	Emitter::default()
		.add_instructions(&GitclBuilder::all_git()?)?
		.add_instructions(&CargoBuilder::all_cargo()?)?
		.emit()?;

	Ok(())
}
