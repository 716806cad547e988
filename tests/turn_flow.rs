//! Full-stack flow over WebSockets: join, start, pass a turn through the
//! last-card prompt, the anti-ukora rejection, and disconnect handling.

use karata_core::card::Card;
use karata_core::game::msg::{GameEvent, MessageKind};
use karata_core::server::actor::UserAction;
use karata_core::test::{spawn_server, WebSocketTest};
use std::net::SocketAddr;
use uuid::Uuid;

async fn connect(addr: SocketAddr, invite: &str, player_id: Uuid, name: &str) -> WebSocketTest {
    WebSocketTest::join_room(addr, invite, player_id, name)
        .await
        .unwrap()
}

#[actix_web::test]
async fn a_full_turn_with_prompt_round_trip() {
    let (addr, _state, _handle) = spawn_server().await;
    let invite = "room-alpha";

    let p1_id = Uuid::new_v4();
    let p2_id = Uuid::new_v4();
    let mut p1 = connect(addr, invite, p1_id, "amina").await;

    p1.expect_event(|event| match event {
        GameEvent::PlayerJoined { player_id, .. } if player_id == p1_id => Some(()),
        _ => None,
    })
    .await;

    let mut p2 = connect(addr, invite, p2_id, "baraka").await;
    p1.expect_event(|event| match event {
        GameEvent::PlayerJoined { player_id, .. } if player_id == p2_id => Some(()),
        _ => None,
    })
    .await;

    p1.send_action(&UserAction::StartGame).await.unwrap();

    p1.expect_event(|event| match event {
        GameEvent::UpdateGameStatus { is_started: true } => Some(()),
        _ => None,
    })
    .await;
    let starting_hand: Vec<Card> = p1
        .expect_event(|event| match event {
            GameEvent::AddCardRangeToHand { cards } => Some(cards),
            _ => None,
        })
        .await;
    assert_eq!(starting_hand.len(), 4);
    p1.expect_event(|event| match event {
        GameEvent::UpdateTurn { index: 0 } => Some(()),
        _ => None,
    })
    .await;

    // player one passes: draws a card, then answers the last-card prompt
    p1.send_action(&UserAction::PerformTurn { cards: vec![] })
        .await
        .unwrap();
    p1.expect_event(|event| match event {
        GameEvent::NotifyTurnProcessed { valid: true } => Some(()),
        _ => None,
    })
    .await;
    let drawn: Vec<Card> = p1
        .expect_event(|event| match event {
            GameEvent::AddCardRangeToHand { cards } => Some(cards),
            _ => None,
        })
        .await;
    assert_eq!(drawn.len(), 1);
    p1.expect_event(|event| match event {
        GameEvent::PromptLastCardRequest => Some(()),
        _ => None,
    })
    .await;

    // anti-ukora: a second turn while the prompt is open is rejected
    p1.send_action(&UserAction::PerformTurn { cards: vec![] })
        .await
        .unwrap();
    p1.expect_event(|event| match event {
        GameEvent::ReceiveSystemMessage {
            kind: MessageKind::Error,
            ..
        } => Some(()),
        _ => None,
    })
    .await;
    p1.expect_event(|event| match event {
        GameEvent::NotifyTurnProcessed { valid: false } => Some(()),
        _ => None,
    })
    .await;

    // the answer releases the turn and play moves on
    p1.send_action(&UserAction::SetLastCardStatus {
        is_last_card: false,
    })
    .await
    .unwrap();
    p1.expect_event(|event| match event {
        GameEvent::UpdateTurn { index: 1 } => Some(()),
        _ => None,
    })
    .await;

    // the other player saw the same turn advance
    p2.expect_event(|event| match event {
        GameEvent::UpdateTurn { index: 1 } => Some(()),
        _ => None,
    })
    .await;

    // player two declares last card on their pass; player one is warned
    p2.send_action(&UserAction::PerformTurn { cards: vec![] })
        .await
        .unwrap();
    p2.expect_event(|event| match event {
        GameEvent::PromptLastCardRequest => Some(()),
        _ => None,
    })
    .await;
    p2.send_action(&UserAction::SetLastCardStatus { is_last_card: true })
        .await
        .unwrap();
    p1.expect_event(|event| match event {
        GameEvent::ReceiveSystemMessage {
            kind: MessageKind::Warning,
            ..
        } => Some(()),
        _ => None,
    })
    .await;
    p2.expect_event(|event| match event {
        GameEvent::UpdateTurn { index: 0 } => Some(()),
        _ => None,
    })
    .await;
}

#[actix_web::test]
async fn playing_out_of_turn_is_rejected() {
    let (addr, _state, _handle) = spawn_server().await;
    let invite = "room-beta";

    let p1_id = Uuid::new_v4();
    let p2_id = Uuid::new_v4();
    let mut p1 = connect(addr, invite, p1_id, "amina").await;
    let mut p2 = connect(addr, invite, p2_id, "baraka").await;
    p1.expect_event(|event| match event {
        GameEvent::PlayerJoined { player_id, .. } if player_id == p2_id => Some(()),
        _ => None,
    })
    .await;

    p1.send_action(&UserAction::StartGame).await.unwrap();
    p2.expect_event(|event| match event {
        GameEvent::UpdateTurn { index: 0 } => Some(()),
        _ => None,
    })
    .await;

    p2.send_action(&UserAction::PerformTurn { cards: vec![] })
        .await
        .unwrap();
    p2.expect_event(|event| match event {
        GameEvent::ReceiveSystemMessage {
            kind: MessageKind::Error,
            ..
        } => Some(()),
        _ => None,
    })
    .await;
    p2.expect_event(|event| match event {
        GameEvent::NotifyTurnProcessed { valid: false } => Some(()),
        _ => None,
    })
    .await;
}

#[actix_web::test]
async fn starting_alone_is_rejected() {
    let (addr, _state, _handle) = spawn_server().await;
    let invite = "room-gamma";

    let p1_id = Uuid::new_v4();
    let mut p1 = connect(addr, invite, p1_id, "amina").await;

    p1.send_action(&UserAction::StartGame).await.unwrap();
    p1.expect_event(|event| match event {
        GameEvent::ReceiveSystemMessage {
            kind: MessageKind::Error,
            ..
        } => Some(()),
        _ => None,
    })
    .await;
}

#[actix_web::test]
async fn a_disconnect_mid_game_ends_it_for_everyone() {
    let (addr, _state, _handle) = spawn_server().await;
    let invite = "room-delta";

    let p1_id = Uuid::new_v4();
    let p2_id = Uuid::new_v4();
    let mut p1 = connect(addr, invite, p1_id, "amina").await;
    let p2 = connect(addr, invite, p2_id, "baraka").await;
    p1.expect_event(|event| match event {
        GameEvent::PlayerJoined { player_id, .. } if player_id == p2_id => Some(()),
        _ => None,
    })
    .await;

    p1.send_action(&UserAction::StartGame).await.unwrap();
    p1.expect_event(|event| match event {
        GameEvent::UpdateGameStatus { is_started: true } => Some(()),
        _ => None,
    })
    .await;

    drop(p2);

    let (reason, winner) = p1
        .expect_event(|event| match event {
            GameEvent::EndGame { reason, winner } => Some((reason, winner)),
            _ => None,
        })
        .await;
    assert!(reason.contains("disconnected"), "reason: {}", reason);
    assert_eq!(winner, None);
}
