/// Alphabet of generated names: `a`-`z` then `A`-`Z`.
const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Prefix of every generated name.
pub const NAME_SIGIL: char = '$';

/// Hands out `$a, $b, ..., $Z, $aa, $ab, ...` from a monotonically increasing counter.
///
/// One generator lives for one conversion and is threaded through the whole class walk,
/// so two classes never receive the same name.
#[derive(Debug, Default)]
pub struct NameGenerator {
    next: usize,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self) -> String {
        let name = short_name(self.next);
        self.next += 1;
        name
    }

    /// Number of names handed out so far.
    pub fn count(&self) -> usize {
        self.next
    }
}

/// The `n`th (0-based) name of the sequence: bijective base-52 with the sigil prefix.
pub fn short_name(mut n: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(ALPHABET[n % 52]);
        n /= 52;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    letters.reverse();

    let mut name = String::with_capacity(letters.len() + 1);
    name.push(NAME_SIGIL);
    name.extend(letters.into_iter().map(char::from));
    name
}
