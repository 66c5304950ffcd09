//! Generation instruction for the text-generation service.

/// The JSON shape the service must produce.
const JSON_STRUCTURE: &str = r#"{
    "title": "Story Title",
    "rootNode": {
        "content": "The starting situation of the story",
        "isEnding": false,
        "isWinningEnding": false,
        "options": [
            {
                "text": "Option 1 text",
                "nextNode": {
                    "content": "What happens for option 1",
                    "isEnding": false,
                    "isWinningEnding": false,
                    "options": []
                }
            }
        ]
    }
}"#;

/// Builds the generation instruction for `theme`.
///
/// Embeds the structural contract the validator later enforces: a title, a
/// root node, 2-3 options per non-ending node, depth 3-4 levels, and at
/// least one winning ending.
#[must_use]
pub fn story_prompt(theme: &str) -> String {
    format!(
        "You are a creative story writer that creates engaging \
         choose-your-own-adventure stories. Generate a complete branching \
         story about the theme: {theme}\n\n\
         The story should have:\n\
         1. A compelling title\n\
         2. A starting situation (root node) with 2-3 options\n\
         3. Each option should lead to another node with its own options\n\
         4. Some paths should lead to endings (both winning and losing)\n\
         5. At least one path should lead to a winning ending\n\n\
         Story structure requirements:\n\
         - Each node should have 2-3 options except for ending nodes\n\
         - The story should be 3-4 levels deep (including the root node)\n\
         - Vary the path lengths within those bounds\n\
         - Make sure there is at least one winning path\n\n\
         Output your story in this exact JSON structure:\n{JSON_STRUCTURE}\n\n\
         Don't simplify or omit any part of the story structure.\n\
         Don't add any text outside of the JSON structure."
    )
}
