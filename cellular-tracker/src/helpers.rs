pub trait SliceExt {
    fn trim(&self, whitespaces: &[u8]) -> &Self;
    fn find(&self, needle: &[u8]) -> Option<usize>;
}

impl SliceExt for [u8] {
    fn trim(&self, whitespaces: &[u8]) -> &[u8] {
        let is_not_whitespace = |c| !whitespaces.contains(c);

        match (
            self.iter().position(is_not_whitespace),
            self.iter().rposition(is_not_whitespace),
        ) {
            (Some(first), Some(last)) => &self[first..=last],
            _ => &[],
        }
    }

    /// Index of the first occurrence of `needle`. An empty needle matches at 0.
    fn find(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return Some(0);
        }
        self.windows(needle.len()).position(|window| window == needle)
    }
}

/// Lines of an AT response, split on `\r`/`\n` with empty lines skipped.
pub fn lines(buf: &[u8]) -> impl Iterator<Item = &[u8]> {
    buf.split(|c| *c == b'\r' || *c == b'\n')
        .filter(|line| !line.is_empty())
}

pub struct LossyStr<'a>(pub &'a [u8]);

impl core::fmt::Debug for LossyStr<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match core::str::from_utf8(self.0) {
            Ok(s) => write!(f, "{:?}", s),
            Err(_) => write!(f, "{:?}", self.0),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LossyStr<'_> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=[u8]:a}", self.0)
    }
}
