use docsense::infrastructure::text_processing::split_sentences;

fn rejoin(text: &str) -> String {
    let split = split_sentences(text);
    let mut out = String::new();
    for (idx, sentence) in split.sentences.iter().enumerate() {
        out.push_str(sentence);
        if let Some(separator) = split.separators.get(idx) {
            out.push_str(separator);
        }
    }
    out
}

#[test]
fn given_plain_sentences_when_splitting_then_splits_after_terminal_punctuation() {
    let split = split_sentences("Hello world. How are you? Fine!");

    assert_eq!(split.sentences, vec!["Hello world.", "How are you?", "Fine!"]);
    assert_eq!(split.separators, vec![" ", " "]);
}

#[test]
fn given_dotted_abbreviation_when_splitting_then_does_not_split() {
    let split = split_sentences("Bring a snack, e.g. an apple. Then leave.");

    assert_eq!(
        split.sentences,
        vec!["Bring a snack, e.g. an apple.", "Then leave."]
    );
}

#[test]
fn given_title_abbreviation_when_splitting_then_does_not_split() {
    let split = split_sentences("Mr. Smith arrived. Dr. Jones left.");

    assert_eq!(split.sentences, vec!["Mr. Smith arrived.", "Dr. Jones left."]);
}

#[test]
fn given_newlines_when_splitting_then_control_runs_are_separators() {
    let split = split_sentences("first line\n\nsecond line");

    assert_eq!(split.sentences, vec!["first line", "second line"]);
    assert_eq!(split.separators, vec!["\n\n"]);
}

#[test]
fn given_zero_width_space_when_splitting_then_format_run_is_a_separator() {
    let split = split_sentences("left\u{200B}right");

    assert_eq!(split.sentences, vec!["left", "right"]);
    assert_eq!(split.separators, vec!["\u{200B}"]);
}

#[test]
fn given_supplementary_plane_format_characters_when_splitting_then_each_is_a_separator() {
    for format in ['\u{E0001}', '\u{110BD}', '\u{1D173}', '\u{13430}', '\u{FEFF}'] {
        let text = format!("alpha{format}beta");

        let split = split_sentences(&text);

        assert_eq!(split.sentences, vec!["alpha", "beta"], "format char {format:?}");
        assert_eq!(split.separators, vec![format.to_string()]);
    }
}

#[test]
fn given_consecutive_format_characters_when_splitting_then_they_form_one_separator() {
    let split = split_sentences("left\u{200B}\u{2060}\u{E0001}right");

    assert_eq!(split.sentences, vec!["left", "right"]);
    assert_eq!(split.separators, vec!["\u{200B}\u{2060}\u{E0001}"]);
}

#[test]
fn given_empty_text_when_splitting_then_returns_no_sentences() {
    let split = split_sentences("");

    assert!(split.sentences.is_empty());
    assert!(split.separators.is_empty());
}

#[test]
fn given_mixed_text_when_rejoining_sentences_and_separators_then_input_is_reproduced() {
    for text in [
        "One. Two?  Three!\n\nFour",
        "No terminal punctuation at all",
        "Trailing space after stop. ",
        "Ünïcödé sentences. Ça va? Oui.",
    ] {
        assert_eq!(rejoin(text), text);
    }
}
