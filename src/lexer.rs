use crate::error::ShellError;

/// Split a raw input line into an argument vector.
///
/// Surrounding whitespace is trimmed, then the line is split on runs of
/// literal space characters. Empty tokens are never produced; an empty or
/// all-whitespace line yields an empty vector, which the caller treats as
/// "nothing to do" rather than an error.
///
/// There is no quoting or escaping: a literal space always separates
/// arguments.
///
/// The token storage grows on demand; a failed growth is reported as
/// [`ShellError::OutOfMemory`] so the caller can skip the cycle instead of
/// aborting the process.
pub fn tokenize(line: &str) -> Result<Vec<String>, ShellError> {
    let mut argv = Vec::new();
    for word in line.trim().split(' ').filter(|w| !w.is_empty()) {
        let mut token = String::new();
        token.try_reserve_exact(word.len())?;
        token.push_str(word);
        argv.try_reserve(1)?;
        argv.push(token);
    }
    Ok(argv)
}
