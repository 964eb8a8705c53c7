//! Demonstrates context-pack assembly and write invalidation
//!
//! This example shows how to:
//! - Build a small concept graph
//! - Assemble a context pack and hit the cache
//! - Observe a write invalidating cached packs

use mentor_kg::{Concept, ConceptPatch, Edge, MasteryLevel, MemoryGraphStore, Mentor, MentorConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mentor = Mentor::new(MemoryGraphStore::new(), MentorConfig::from_env()?)?;
    let writer = mentor.writer();

    // 1. Create concepts
    println!("1. Creating concepts...");
    for (id, title, summary) in [
        ("kv-cache", "KV Cache", "Reuse keys and values from earlier decoding steps"),
        ("attention", "Attention", "Weighted mixing of values by query/key similarity"),
        ("transformer", "Transformer", "Stacked attention and feed-forward blocks"),
        ("softmax", "Softmax", "Normalizes scores into a distribution"),
        ("decode-loop", "Decode loop", "Token-by-token generation"),
    ] {
        writer
            .create_concept(Concept::new(id, title, summary))
            .await?;
        println!("   Created concept: {} - {}", id, title);
    }

    // 2. Link them
    println!("\n2. Linking prerequisites...");
    writer
        .create_edge(Edge::prerequisite("kv-cache", "attention"))
        .await?;
    writer
        .create_edge(Edge::prerequisite("attention", "transformer"))
        .await?;
    writer
        .create_edge(Edge::prerequisite("attention", "softmax"))
        .await?;
    writer
        .create_edge(Edge::example("kv-cache", "decode-loop"))
        .await?;
    println!("   Graph version: {}", mentor.graph_version());

    // 3. Assemble
    println!("\n3. Assembling context pack for kv-cache (budget 4)...");
    let pack = mentor.context_pack("kv-cache", Some(4)).await?;
    print!("{}", pack.render_markdown());
    println!("   truncated: {}, key: {}", pack.truncated, pack.cache_key);

    mentor.context_pack("kv-cache", Some(4)).await?;
    println!("   Cache after repeat: {}", mentor.cache_stats().await);

    // 4. Write and re-read
    println!("\n4. Marking attention as mastered...");
    let committed = writer
        .update_concept(
            "attention",
            ConceptPatch {
                mastery: Some(MasteryLevel::Mastered),
                ..Default::default()
            },
        )
        .await?;
    println!(
        "   Version {} ({} cached packs dropped)",
        committed.receipt.version, committed.receipt.invalidated
    );

    let fresh = mentor.context_pack("kv-cache", Some(4)).await?;
    print!("{}", fresh.render_markdown());

    // 5. Study order
    println!("\n5. Study order for kv-cache:");
    for (step, concept) in mentor.study_order("kv-cache").await?.iter().enumerate() {
        println!("   {}. {}", step + 1, concept.title);
    }

    Ok(())
}
