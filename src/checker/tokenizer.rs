use unicode_segmentation::UnicodeSegmentation;

/// A word found in running text, with its 1-based line and column.
///
/// Columns count characters, not bytes. `offset` is the byte position of
/// the word in the whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// Start of a letter run inside a line.
#[derive(Clone, Copy, Default)]
struct RunStart {
    line: usize,
    column: usize,
    offset: usize,
}

fn joins_word(grapheme: &str) -> bool {
    let ch = grapheme.chars().next().unwrap_or(' ');
    ch.is_alphabetic() || matches!(ch, '\'' | '\u{2019}' | '-')
}

/// Split `text` into letter runs; apostrophes and hyphens only survive
/// inside a word.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut line_offset = 0;

    for (line_idx, raw) in text.split_inclusive('\n').enumerate() {
        let line = raw.trim_end_matches(['\n', '\r']);
        let mut current = String::new();
        let mut start = RunStart::default();
        let mut column = 0;
        let mut offset = line_offset;

        for grapheme in line.graphemes(true) {
            if joins_word(grapheme) {
                if current.is_empty() {
                    start = RunStart {
                        line: line_idx + 1,
                        column,
                        offset,
                    };
                }
                current.push_str(grapheme);
            } else if !current.is_empty() {
                push_trimmed(&mut tokens, &current, start);
                current.clear();
            }
            column += grapheme.chars().count();
            offset += grapheme.len();
        }

        if !current.is_empty() {
            push_trimmed(&mut tokens, &current, start);
        }
        line_offset += raw.len();
    }

    tokens
}

fn push_trimmed(tokens: &mut Vec<Token>, run: &str, start: RunStart) {
    let word = run.trim_matches(|c: char| !c.is_alphabetic());
    if word.is_empty() {
        return;
    }
    let leading = &run[..run.len() - run.trim_start_matches(|c: char| !c.is_alphabetic()).len()];

    tokens.push(Token {
        text: word.to_string(),
        line: start.line,
        column: start.column + leading.chars().count() + 1,
        offset: start.offset + leading.len(),
    });
}
