//! Round state machine for 20 Questions
//!
//! One round walks the decision tree from the root, asking the question at
//! each internal node and following the yes/no branch, until it either
//! guesses an answer leaf, gets stumped and learns, or burns through the
//! question budget. Every prompt counts against the budget, the terminal
//! guess included.
//!
//! All user interaction goes through the `Console` trait so the engine stays
//! free of any terminal dependency; the CLI plugs in stdin/stdout and tests
//! plug in a scripted fake.

use std::io;

use crate::node::{DecisionTree, Node, NodeId, TreeError};

/// Fixed cap on prompts per round before the user wins by exhaustion.
pub const QUESTION_BUDGET: u32 = 20;

/// Affirmative iff the trimmed response starts with `y` or `Y`.
pub fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().chars().next(), Some('y') | Some('Y'))
}

/// Interactive collaborator the game prompts through.
///
/// Implementations own the yes/no interpretation of raw text (the stdio
/// console routes through `is_affirmative`).
pub trait Console {
    /// Present a yes/no prompt and read the response.
    fn ask_yes_no(&mut self, prompt: &str) -> io::Result<bool>;
    /// Present a free-text prompt and read one trimmed line.
    fn ask_line(&mut self, prompt: &str) -> io::Result<String>;
    /// Emit one line of output.
    fn say(&mut self, line: &str) -> io::Result<()>;
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The program guessed the item and the user confirmed.
    Won,
    /// The guess was rejected and the tree grew by a question/answer pair.
    Learned,
    /// The budget ran out before any guess was confirmed or rejected.
    Exhausted,
}

/// Errors surfaced while driving a round.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("question node {0} is missing a child branch")]
    MissingChild(NodeId),
}

/// What the traversal found at the current node, copied out so the tree can
/// be mutated afterwards without borrow conflicts.
enum Step {
    Question { value: String, left: Option<NodeId>, right: Option<NodeId> },
    Answer { value: String },
}

fn read_node(tree: &DecisionTree, id: NodeId) -> Result<Step, GameError> {
    match tree.get(id).ok_or(TreeError::MissingNode(id))? {
        Node::Question { value, left, right, .. } => Ok(Step::Question {
            value: value.clone(),
            left: *left,
            right: *right,
        }),
        Node::Answer { value, .. } => Ok(Step::Answer { value: value.clone() }),
    }
}

/// Game driver owning the (mutable) decision tree across rounds.
pub struct Game {
    tree: DecisionTree,
}

impl Game {
    /// Create a game over a loaded or bootstrapped tree.
    pub fn new(tree: DecisionTree) -> Self {
        Game { tree }
    }

    /// The tree in its current (possibly grown) state.
    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    /// Play one round from the current root.
    ///
    /// Learning (on a rejected guess) completes all reference updates before
    /// this returns, so a following round never observes a half-spliced tree.
    pub fn play_round(&mut self, console: &mut dyn Console) -> Result<RoundOutcome, GameError> {
        let mut current = self.tree.root_id();
        let mut questions_asked = 0u32;

        while questions_asked < QUESTION_BUDGET {
            questions_asked += 1;

            match read_node(&self.tree, current)? {
                Step::Question { value, left, right } => {
                    let yes = console.ask_yes_no(&format!("{value} (y/n): "))?;
                    let next = if yes { left } else { right };
                    current = next.ok_or(GameError::MissingChild(current))?;
                }
                Step::Answer { value } => {
                    let confirmed =
                        console.ask_yes_no(&format!("Is it a(n) {value}? (y/n): "))?;
                    if confirmed {
                        console.say("I win! Better luck next time.")?;
                        return Ok(RoundOutcome::Won);
                    }

                    console.say("You've stumped me! Help me learn how to beat you next time.")?;
                    let item = console.ask_line("What were you thinking of? ")?;
                    let question = console.ask_line(&format!(
                        "Give me a new yes/no question that would distinguish {item} from {value}: "
                    ))?;
                    let item_answers_yes = console.ask_yes_no(&format!(
                        "Would a(n) {item} be associated with a yes or no answer to your new question? (y/n): "
                    ))?;
                    self.tree.learn(current, question, item, item_answers_yes)?;
                    return Ok(RoundOutcome::Learned);
                }
            }
        }

        console.say("I've run out of questions! You win!")?;
        Ok(RoundOutcome::Exhausted)
    }

    /// Play rounds until the user declines the replay prompt. Each replay
    /// restarts from the current root, which may have been redirected by a
    /// learning step in an earlier round.
    pub fn run(&mut self, console: &mut dyn Console) -> Result<(), GameError> {
        loop {
            self.play_round(console)?;
            if !console.ask_yes_no("Play again? (y/n): ")? {
                return Ok(());
            }
        }
    }
}
