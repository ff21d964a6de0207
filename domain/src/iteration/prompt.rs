//! Iteration prompt assembly

use super::context::IterationContext;

/// Rendered in place of an empty list so no section silently disappears.
pub const NONE_PLACEHOLDER: &str = "- None";

/// Builds the augmented system prompt of an iteration round
pub struct IterationPrompt;

impl IterationPrompt {
    /// Append the iteration guidelines, critique, base song and original
    /// request to `base_prompt`, which is kept intact at the top.
    pub fn build(base_prompt: &str, context: &IterationContext) -> String {
        let mut prompt = String::with_capacity(base_prompt.len() + 2048);
        prompt.push_str(base_prompt.trim_end());

        prompt.push_str(
            r#"

# ITERATION GUIDELINES

You are revising an existing song, not writing a new one.
- Make minimal, targeted edits that address the feedback below.
- Keep everything listed under strengths exactly as it is.
- Do not change sections that no feedback item refers to.
- Return the complete revised song in the same JSON format.
"#,
        );

        prompt.push_str("\n## Strengths to preserve (keep as-is)\n");
        push_bullets(&mut prompt, &context.evaluation.strengths);

        prompt.push_str("\n## Weaknesses to address (targeted changes required)\n");
        push_bullets(&mut prompt, &context.evaluation.weaknesses);

        prompt.push_str("\n## Recommendations (in priority order)\n");
        for (bucket, items) in context.evaluation.recommendations.buckets() {
            prompt.push_str(&format!("\n### {}\n", bucket.label()));
            push_bullets(&mut prompt, items);
        }

        prompt.push_str(&format!(
            r#"
## Current song to improve

This is the required starting point, not a suggestion. Revise it; do not replace it.

### Style
{}

### Lyrics
{}
"#,
            context.base_song.style, context.base_song.lyrics
        ));

        prompt.push_str(&format!(
            "\n## Original request\n\nSong Description: {}\nDesired Style: {}\n",
            context.original_request, context.original_style
        ));

        if let Some(instructions) = context.instructions() {
            prompt.push_str(&format!("\n## Custom instructions\n\n{}\n", instructions));
        }

        prompt.push_str(&format!("\nIteration #{}\n", context.iteration_number));
        prompt
    }
}

fn push_bullets(prompt: &mut String, items: &[String]) {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        prompt.push_str(NONE_PLACEHOLDER);
        prompt.push('\n');
        return;
    }
    for item in items {
        prompt.push_str("- ");
        prompt.push_str(item);
        prompt.push('\n');
    }
}
