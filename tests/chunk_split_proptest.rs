//! Property-based tests: fragment output does not depend on chunk boundaries.

use futures_util::StreamExt;
use proptest::prelude::*;
use wikistream::prelude::*;

fn arb_content() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{1,12}",
        "[\u{4e00}-\u{9fa5}]{1,6}",
        Just("🐨 koala".to_string()),
        Just("line\nbreak \"quoted\"".to_string()),
    ]
}

fn render(contents: &[String], sentinel: bool) -> Vec<u8> {
    let mut body = String::new();
    for content in contents {
        let payload = serde_json::json!({ "choices": [{ "delta": { "content": content } }] });
        body.push_str(&format!("data: {payload}\n\n"));
    }
    if sentinel {
        body.push_str("data: [DONE]\n");
    }
    body.into_bytes()
}

fn split_at_points(bytes: &[u8], mut points: Vec<usize>) -> Vec<Vec<u8>> {
    points.retain(|p| *p > 0 && *p < bytes.len());
    points.sort_unstable();
    points.dedup();

    let mut chunks = Vec::new();
    let mut start = 0;
    for p in points {
        chunks.push(bytes[start..p].to_vec());
        start = p;
    }
    chunks.push(bytes[start..].to_vec());
    chunks
}

fn collect(chunks: Vec<Vec<u8>>) -> Vec<StreamEvent> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    runtime.block_on(async move {
        let items: Vec<Result<Vec<u8>, WikiError>> = chunks.into_iter().map(Ok).collect();
        let mut stream =
            StreamConsumer::frame_bytes(futures::stream::iter(items), CancelHandle::new());
        let mut events = Vec::new();
        while let Some(item) = stream.next().await {
            events.push(item.expect("no error"));
        }
        events
    })
}

proptest! {
    #[test]
    fn fragments_survive_any_chunking(
        contents in prop::collection::vec(arb_content(), 1..8),
        points in prop::collection::vec(0usize..2048, 0..24),
        sentinel in any::<bool>(),
    ) {
        let bytes = render(&contents, sentinel);
        let events = collect(split_at_points(&bytes, points));

        let mut expected: Vec<StreamEvent> =
            contents.iter().cloned().map(StreamEvent::Fragment).collect();
        expected.push(StreamEvent::Completed);
        prop_assert_eq!(events, expected);
    }

    #[test]
    fn single_byte_chunks_match_one_chunk(
        contents in prop::collection::vec(arb_content(), 1..4),
    ) {
        let bytes = render(&contents, true);
        let whole = collect(vec![bytes.clone()]);
        let bytewise = collect(bytes.iter().map(|b| vec![*b]).collect());
        prop_assert_eq!(whole, bytewise);
    }
}
