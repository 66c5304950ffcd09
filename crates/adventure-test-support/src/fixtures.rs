//! Canonical story fixtures.

/// A structurally valid generated story in the generation-contract shape:
/// three levels deep, two options per branch, one winning ending.
pub const VALID_STORY_JSON: &str = r#"{
    "title": "Mutiny on the Red Comet",
    "rootNode": {
        "content": "The Red Comet drifts without power off the shipping lanes.",
        "isEnding": false,
        "isWinningEnding": false,
        "options": [
            {
                "text": "Dock and board her",
                "nextNode": {
                    "content": "The cargo hold is stacked with unmarked crates.",
                    "isEnding": false,
                    "isWinningEnding": false,
                    "options": [
                        {
                            "text": "Pry open a crate",
                            "nextNode": {
                                "content": "Gold bars. You fly home rich.",
                                "isEnding": true,
                                "isWinningEnding": true,
                                "options": []
                            }
                        },
                        {
                            "text": "Head for the bridge",
                            "nextNode": {
                                "content": "The crew was waiting. You walk the airlock.",
                                "isEnding": true,
                                "isWinningEnding": false,
                                "options": []
                            }
                        }
                    ]
                }
            },
            {
                "text": "Hail her on an open channel",
                "nextNode": {
                    "content": "A distress code crackles back, half scrambled.",
                    "isEnding": false,
                    "isWinningEnding": false,
                    "options": [
                        {
                            "text": "Relay it to the patrol",
                            "nextNode": {
                                "content": "The patrol takes the prize and the credit.",
                                "isEnding": true,
                                "isWinningEnding": false,
                                "options": []
                            }
                        },
                        {
                            "text": "Jam it and move in",
                            "nextNode": {
                                "content": "Your jammer fails. The Comet's guns do not.",
                                "isEnding": true,
                                "isWinningEnding": false,
                                "options": []
                            }
                        }
                    ]
                }
            }
        ]
    }
}"#;
