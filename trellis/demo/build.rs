use trellis_gen::errors::GeneratorError;

fn main() -> Result<(), GeneratorError> {
    trellis_gen::buildscript::generate(&["src/schema.rs"])?;
    Ok(())
}
