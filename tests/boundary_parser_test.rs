use docsense::domain::Marker;
use docsense::infrastructure::text_processing::parse_boundaries;

fn markers(indexes: &[u32]) -> Vec<Marker> {
    indexes.iter().map(|i| Marker::new(*i)).collect()
}

#[test]
fn given_python_fenced_block_when_parsing_then_returns_markers_in_order() {
    let response = "Here you go:\n```python\nsections = ['【0†source】', '【2†source】', '【4†source】']\n```";

    assert_eq!(parse_boundaries(response), Some(markers(&[0, 2, 4])));
}

#[test]
fn given_untagged_fence_when_parsing_then_returns_markers() {
    let response = "```\nsections = ['【3†source】']\n```";

    assert_eq!(parse_boundaries(response), Some(markers(&[3])));
}

#[test]
fn given_several_fenced_blocks_when_parsing_then_last_qualifying_block_wins() {
    let response = "First try:\n```python\nsections = ['【1†source】']\n```\n\
                    Corrected:\n```python\nsections = ['【5†source】', '【8†source】']\n```\n\
                    ```text\nnot a list\n```";

    assert_eq!(parse_boundaries(response), Some(markers(&[5, 8])));
}

#[test]
fn given_bare_assignment_without_fence_when_parsing_then_returns_markers() {
    let response = "sections = [\"【6†source】\", \"【9†source】\",] is my answer";

    assert_eq!(parse_boundaries(response), Some(markers(&[6, 9])));
}

#[test]
fn given_prose_mentioning_sections_before_the_list_when_parsing_then_finds_the_list() {
    let response = "I found two sections. sections = ['【2†source】', '【7†source】']";

    assert_eq!(parse_boundaries(response), Some(markers(&[2, 7])));
}

#[test]
fn given_empty_list_when_parsing_then_returns_empty_markers() {
    assert_eq!(parse_boundaries("```python\nsections = []\n```"), Some(Vec::new()));
}

#[test]
fn given_garbage_response_when_parsing_then_returns_none() {
    assert_eq!(parse_boundaries("I cannot help with that."), None);
    assert_eq!(parse_boundaries(""), None);
}

#[test]
fn given_list_with_non_marker_element_when_parsing_then_returns_none() {
    let response = "```python\nsections = ['【1†source】', 'chapter two']\n```";

    assert_eq!(parse_boundaries(response), None);
}

#[test]
fn given_code_instead_of_literal_when_parsing_then_nothing_is_evaluated() {
    let response = "```python\nsections = [str(i) for i in range(3)]\n```";

    assert_eq!(parse_boundaries(response), None);
}

#[test]
fn given_later_block_with_trailing_statement_when_parsing_then_earlier_block_wins() {
    let response = "```python\nsections = ['【1†source】']\n```\n\
                    ```python\nsections = ['【3†source】']\nprint(sections)\n```";

    assert_eq!(parse_boundaries(response), Some(markers(&[1])));
}

#[test]
fn given_trailing_semicolon_when_parsing_then_block_is_accepted() {
    let response = "```python\nsections = ['【4†source】'];\n```";

    assert_eq!(parse_boundaries(response), Some(markers(&[4])));
}

#[test]
fn given_marker_padded_inside_quotes_when_parsing_then_whitespace_is_trimmed() {
    let response = "```\nsections = [' 【1†source】 ']\n```";

    assert_eq!(parse_boundaries(response), Some(markers(&[1])));
}
