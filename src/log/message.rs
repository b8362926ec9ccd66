use super::Error;
use crate::region::Region;

pub const UNEXPECTED_BLOCK: &str = "unexpected block";
pub const UNCLOSED_BLOCK: &str = "unclosed block";
pub const INVALID_SYNTAX: &str = "invalid syntax";
pub const INVALID_FUNCTION: &str = "invalid function";
pub const MISSING_PARAMETERS: &str = "missing required parameters";

/// Return an [`Error`] explaining that the write operation failed.
///
/// This is likely caused by a failure during a `write!` macro operation.
pub fn error_write() -> Error {
    Error::build("write failure")
        .with_help("failed to write result of render, are you low on memory?")
}

/// Return an [`Error`] describing a missing template.
pub fn error_missing_template(name: &str) -> Error {
    Error::build("missing template").with_help(format!(
        "template `{name}` not found in engine, add it with `.add_template`"
    ))
}

/// Return an [`Error`] naming the parameters absent from the bindings.
pub fn error_missing_parameters(names: &[String]) -> Error {
    Error::build(format!("{MISSING_PARAMETERS}: {}", names.join(", ")))
}

/// Return an [`Error`] describing a function that is not registered.
pub fn error_invalid_function(source: &str, region: Region) -> Error {
    Error::build(INVALID_FUNCTION)
        .with_pointer(source, region)
        .with_help(format!(
            "template wants to use the `{}` function, but a function with that name was not \
            found in this engine, did you add the function with `.add_function` or \
            `.add_function_must`?",
            &source[region]
        ))
}

/// Return an [`Error`] describing a block that was never closed, pointing at
/// the tag that opened it.
pub fn error_unclosed(
    source: &str,
    region: Region,
    keyword: &str,
    begin: &str,
    end: &str,
) -> Error {
    Error::build(UNCLOSED_BLOCK)
        .with_pointer(source, region)
        .with_help(format!(
            "did you close the `{keyword}` block with `{begin}/{keyword}{end}`?"
        ))
}
