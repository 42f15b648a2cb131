// Copyright (C) 2020-2026 Andy Kurnia.

// https://github.com/kkawakam/rustyline/blob/master/examples/derive.rs

#[derive(
    rustyline_derive::Completer,
    rustyline_derive::Helper,
    rustyline_derive::Highlighter,
    rustyline_derive::Hinter,
    rustyline_derive::Validator,
)]
pub struct MyHelper {
    #[rustyline(Completer)]
    completer: rustyline::completion::FilenameCompleter,
    #[rustyline(Highlighter)]
    highlighter: rustyline::highlight::MatchingBracketHighlighter,
    #[rustyline(Validator)]
    validator: rustyline::validate::MatchingBracketValidator,
    #[rustyline(Hinter)]
    hinter: rustyline::hint::HistoryHinter,
}

pub type MyEditor = rustyline::Editor<MyHelper, rustyline::history::DefaultHistory>;

pub fn new_rl_editor() -> rustyline::Result<MyEditor> {
    let mut rl = MyEditor::new()?;
    rl.set_helper(Some(MyHelper {
        completer: rustyline::completion::FilenameCompleter::new(),
        highlighter: rustyline::highlight::MatchingBracketHighlighter::new(),
        validator: rustyline::validate::MatchingBracketValidator::new(),
        hinter: rustyline::hint::HistoryHinter::new(),
    }));
    Ok(rl)
}
