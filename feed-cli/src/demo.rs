//! Canned server for `--mock`.
//!
//! Each process gets a fresh transport, so every reply is queued for the
//! requests one command can make. More specific routes go first since
//! routes match by substring in insertion order.

use feed_client::{MockReply, MockTransport};
use serde_json::{json, Value};

const CLUB_ID: u64 = 2;
const POST_IDS: [u64; 3] = [3, 2, 1];

fn post(id: u64) -> Value {
    let (content, topics) = match id {
        3 => (
            "Info session friday, details at www.csclub.example/events",
            vec![json!({"id": 1, "name": "cs"}), json!({"id": 2, "name": "careers"})],
        ),
        2 => (
            "Hack night moved to room 204. Slides: https://csclub.example/slides",
            vec![json!({"id": 1, "name": "cs"})],
        ),
        _ => ("Welcome to the new term!", Vec::new()),
    };
    json!({
        "id": id,
        "author": {
            "id": CLUB_ID,
            "display_name": "CS Club",
            "avatar_url": "",
            "role": "organization"
        },
        "content": content,
        "created_at": format!("2024-03-0{}T12:00:00Z", id),
        "topics": topics,
        "likes": id - 1,
        "liked_by": [],
        "hidden": false
    })
}

fn page() -> Value {
    json!({
        "posts": POST_IDS.iter().map(|id| post(*id)).collect::<Vec<_>>(),
        "has_before": false,
        "has_after": false
    })
}

/// A transport answering like a small server with three posts.
pub fn transport() -> MockTransport {
    let transport = MockTransport::new();

    transport.queue_for("/like/", MockReply::json(200, &json!({"likes": 3})));
    transport.queue_for("?action=", MockReply::status(200));
    transport.queue_for(
        "/topics",
        MockReply::json(
            200,
            &json!({"topics": [{"id": 1, "name": "cs"}, {"id": 2, "name": "careers"}]}),
        ),
    );

    let mut created = post(4);
    created["author"] =
        json!({"id": 1, "display_name": "You", "avatar_url": "", "role": "regular"});
    transport.queue_for("/account/self/", MockReply::json(200, &created));

    // Organization pages contain "/posts?" too.
    for _ in 0..2 {
        transport.queue_for(
            &format!("/organizations/{}/", CLUB_ID),
            MockReply::json(200, &page()),
        );
    }
    for _ in 0..2 {
        transport.queue_for(
            "/organizations/",
            MockReply::json(
                200,
                &json!({"posts": [], "has_before": false, "has_after": false}),
            ),
        );
    }
    for _ in 0..3 {
        transport.queue_for("/posts?", MockReply::json(200, &page()));
    }

    // A lookup, then a delete.
    for id in POST_IDS {
        for _ in 0..2 {
            transport.queue_for(&format!("/posts/{}", id), MockReply::json(200, &post(id)));
        }
    }

    for _ in 0..2 {
        transport.queue(MockReply::json(404, &json!({"error": "not found"})));
    }

    transport
}
