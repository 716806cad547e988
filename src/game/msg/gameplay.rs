use actix::{AsyncContext, Context, Handler, Message, ResponseFuture};
use uuid::Uuid;

use crate::{
    card::Card,
    exception::{GameError, StateError},
    game::{
        msg::lifecycle::StopGame,
        turn::{self, TurnOutcome},
        GameActor, RoomChannel,
    },
};

/// One attempt to play a (possibly empty) card sequence.
#[derive(Message)]
#[rtype(result = "Result<(), GameError>")]
pub struct PerformTurn {
    pub player_id: Uuid,
    pub cards: Vec<Card>,
}

impl Handler<PerformTurn> for GameActor {
    type Result = ResponseFuture<Result<(), GameError>>;

    fn handle(&mut self, msg: PerformTurn, ctx: &mut Context<Self>) -> Self::Result {
        let game = self.game.clone();
        let connections = self.connections.clone();
        let prompts = self.prompts.clone();
        let persister = self.persister.clone();
        let addr = ctx.address();

        Box::pin(async move {
            // Anti-ukora: a player the server is still waiting on cannot
            // queue another turn. Checked before touching the game lock.
            if prompts.has_pending(msg.player_id) {
                return Err(StateError::OutstandingPrompt.into());
            }

            let channel = RoomChannel::new(connections.lock().await.clone());
            let mut game = game.lock().await;
            let outcome = turn::run_turn(
                &mut game,
                &channel,
                &prompts,
                persister.as_ref(),
                msg.player_id,
                msg.cards,
            )
            .await;

            if let TurnOutcome::Ended = outcome {
                addr.do_send(StopGame);
            }
            // Rejections were already reported to the caller through events.
            Ok(())
        })
    }
}
