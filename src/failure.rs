/// Why a resolve or render produced nothing.
///
/// The public entry points flatten every failure to `None`; the kind is what
/// gets logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No source knows the identifier, or a source could not be reached.
    NotFound,
    /// Input or a remote payload could not be parsed.
    Unparsable,
    /// Parsing succeeded but nothing drawable came out of it.
    Degenerate,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::NotFound => "not found",
            Self::Unparsable => "unparsable",
            Self::Degenerate => "degenerate",
        };
        f.write_str(text)
    }
}
