//! Quiz question set
//!
//! Static data: five questions, four options each, every option mapped to
//! exactly one personality category.

use crate::personality::Category;

/// A single answer option.
#[derive(Debug, Clone, Copy)]
pub struct AnswerOption {
    pub text: &'static str,
    pub category: Category,
}

/// A quiz question with its ordered options.
#[derive(Debug, Clone, Copy)]
pub struct Question {
    pub id: u32,
    pub prompt: &'static str,
    pub options: &'static [AnswerOption],
}

/// The fixed question set, in presentation order.
pub const QUESTIONS: &[Question] = &[
    Question {
        id: 1,
        prompt: "You've just discovered a mysterious portal to the crypto universe. What's the first thing you do?",
        options: &[
            AnswerOption {
                text: "Carefully study the portal, read all the instructions, and make a plan.",
                category: Category::Bitcoin,
            },
            AnswerOption {
                text: "Jump in immediately - adventure awaits!",
                category: Category::Solana,
            },
            AnswerOption {
                text: "Call your friends to see if they've heard about it and ask for advice.",
                category: Category::Ethereum,
            },
            AnswerOption {
                text: "Take a selfie with the portal and post it online before stepping through.",
                category: Category::Dogecoin,
            },
        ],
    },
    Question {
        id: 2,
        prompt: "As you step through the portal, you find yourself in a bustling crypto marketplace. What catches your eye first?",
        options: &[
            AnswerOption {
                text: "A booth offering a secure vault for long-term investments.",
                category: Category::Bitcoin,
            },
            AnswerOption {
                text: "A fast-paced auction where people are flipping NFTs for huge profits.",
                category: Category::Solana,
            },
            AnswerOption {
                text: "A group of people collaborating on a cutting-edge DeFi project.",
                category: Category::Ethereum,
            },
            AnswerOption {
                text: "A crowd gathered around a booth giving away free tokens and memes.",
                category: Category::Dogecoin,
            },
        ],
    },
    Question {
        id: 3,
        prompt: "You're approached by a guide who offers to help you navigate the marketplace. What kind of guide do you choose?",
        options: &[
            AnswerOption {
                text: "A wise and experienced mentor who knows the history of the crypto world.",
                category: Category::Bitcoin,
            },
            AnswerOption {
                text: "A daring adventurer who's always chasing the next big thing.",
                category: Category::Solana,
            },
            AnswerOption {
                text: "A tech-savvy innovator who's building the future of blockchain.",
                category: Category::Ethereum,
            },
            AnswerOption {
                text: "A fun and friendly mascot who makes everything feel lighthearted.",
                category: Category::Dogecoin,
            },
        ],
    },
    Question {
        id: 4,
        prompt: "The guide takes you to a treasure chest filled with crypto opportunities. How do you decide what to take?",
        options: &[
            AnswerOption {
                text: "Choose the most stable and reliable treasure - it's a long-term investment.",
                category: Category::Bitcoin,
            },
            AnswerOption {
                text: "Grab the rarest and most valuable item before anyone else can.",
                category: Category::Solana,
            },
            AnswerOption {
                text: "Pick something that can be used to build or create something new.",
                category: Category::Ethereum,
            },
            AnswerOption {
                text: "Take the item that looks the most fun and exciting, even if it's not the most valuable.",
                category: Category::Dogecoin,
            },
        ],
    },
    Question {
        id: 5,
        prompt: "As you leave the marketplace, you're invited to join a crypto community. What kind of group do you join?",
        options: &[
            AnswerOption {
                text: "A group of seasoned investors who share tips on long-term strategies.",
                category: Category::Bitcoin,
            },
            AnswerOption {
                text: "A fast-paced trading group that's always on the hunt for the next big win.",
                category: Category::Solana,
            },
            AnswerOption {
                text: "A collaborative team working on innovative blockchain projects.",
                category: Category::Ethereum,
            },
            AnswerOption {
                text: "A fun and welcoming community that loves sharing memes and good vibes.",
                category: Category::Dogecoin,
            },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_set_shape() {
        assert_eq!(QUESTIONS.len(), 5);
        for question in QUESTIONS {
            assert_eq!(question.options.len(), Category::COUNT);
        }
    }

    #[test]
    fn test_every_question_covers_every_category() {
        for question in QUESTIONS {
            for category in Category::ALL {
                assert!(
                    question.options.iter().any(|o| o.category == category),
                    "question {} missing option for {}",
                    question.id,
                    category
                );
            }
        }
    }

    #[test]
    fn test_ids_are_sequential() {
        for (i, question) in QUESTIONS.iter().enumerate() {
            assert_eq!(question.id as usize, i + 1);
        }
    }
}
