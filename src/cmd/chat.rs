use std::io::{self, BufRead, Write};

use crate::context::AppContext;
use crate::domain::conversation::ConversationState;
use crate::error::AppResult;
use crate::workflow::turn::{self, GREETING};

/// One chat session: a conversation state exclusively owned by this loop,
/// fed turn by turn into the orchestrator. Turns resolve sequentially; a
/// submission finishes before the next prompt is read.
pub struct SupportSession {
    ctx: AppContext,
    state: ConversationState,
}

impl SupportSession {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: ConversationState::new(),
        }
    }

    pub async fn handle_user_turn(&mut self, user_text: &str) -> String {
        turn::handle_user_turn(&self.ctx, &mut self.state, user_text).await
    }
}

pub async fn run(ctx: AppContext) -> AppResult<()> {
    let mut session = SupportSession::new(ctx);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{GREETING}");
    println!("(escribe \"salir\" para terminar)\n");

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let user_text = line.trim();
        if user_text.is_empty() {
            continue;
        }
        if user_text.eq_ignore_ascii_case("salir") {
            break;
        }

        let reply = session.handle_user_turn(user_text).await;
        println!("\n{reply}\n");
    }

    Ok(())
}
