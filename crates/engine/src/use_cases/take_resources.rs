//! Take resources use case.
//!
//! Coin or card take at turn start. The requested amount is server-trusted
//! input bound by game settings upstream; the handler applies it as given.

use std::sync::Arc;

use citadels_domain::{economy, Catalog, GameAction, GameSettings, ResourcePerk};

use crate::infrastructure::ports::{LobbyRepo, MessagingGateway, PlayerRepo};

use super::eligibility;
use super::error::ActionError;
use super::ActionContext;

/// Which resource a take-resources request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Coin,
    Card,
}

pub struct TakeResources {
    lobbies: Arc<dyn LobbyRepo>,
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    catalog: Arc<Catalog>,
    settings: GameSettings,
}

impl TakeResources {
    pub fn new(
        lobbies: Arc<dyn LobbyRepo>,
        players: Arc<dyn PlayerRepo>,
        gateway: Arc<dyn MessagingGateway>,
        catalog: Arc<Catalog>,
        settings: GameSettings,
    ) -> Self {
        Self {
            lobbies,
            players,
            gateway,
            catalog,
            settings,
        }
    }

    pub async fn execute(
        &self,
        ctx: ActionContext,
        kind: ResourceKind,
        amount: u32,
    ) -> Result<(), ActionError> {
        let ActionContext {
            mut lobby,
            mut player,
            character,
        } = ctx;

        player.actions_mut().remove(GameAction::TakeResources);

        let mut drawn = Vec::new();
        match kind {
            ResourceKind::Card => {
                drawn = lobby.draw(amount as usize);
                player.add_to_hand(drawn.iter().cloned());
                if character.resource_perk == Some(ResourcePerk::BonusCoinsOnCardTake) {
                    player.credit_coins(economy::card_take_bonus_coins(&self.settings));
                }
            }
            ResourceKind::Coin => {
                player.credit_coins(amount);
                if character.resource_perk == Some(ResourcePerk::BonusCardsOnCoinTake) {
                    drawn = lobby.draw(economy::coin_take_bonus_cards(&self.settings) as usize);
                    player.add_to_hand(drawn.iter().cloned());
                }
            }
        }

        if !drawn.is_empty() {
            self.lobbies
                .update_card_deck(lobby.id(), lobby.card_deck())
                .await?;
            self.players
                .update_quarter_hand(player.id(), player.quarter_hand())
                .await?;
        }
        self.players.update_coins(player.id(), player.coins()).await?;
        self.players
            .update_game_actions(player.id(), player.actions())
            .await?;

        if !drawn.is_empty() {
            if let Err(e) = self.gateway.send_card_images(player.chat(), &drawn).await {
                tracing::warn!(player = %player.id(), error = %e, "failed to show drawn cards");
            }
        }

        eligibility::refresh_menu(
            &self.players,
            &self.gateway,
            &mut player,
            &character,
            &self.catalog,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockLobbyRepo, MockMessagingGateway, MockPlayerRepo};
    use crate::use_cases::fixtures;
    use citadels_domain::{ActionSlot, GameActions, MessageId};

    fn turn_slots() -> GameActions {
        GameActions::new(vec![
            ActionSlot::Single(GameAction::TakeResources),
            ActionSlot::Single(GameAction::EndTurn),
        ])
    }

    fn use_case(
        lobbies: MockLobbyRepo,
        players: MockPlayerRepo,
        gateway: MockMessagingGateway,
    ) -> TakeResources {
        TakeResources::new(
            Arc::new(lobbies),
            Arc::new(players),
            Arc::new(gateway),
            Arc::new(fixtures::catalog()),
            fixtures::settings(),
        )
    }

    #[tokio::test]
    async fn merchant_card_take_draws_and_awards_bonus_coins() {
        let catalog = fixtures::catalog();
        let lobby = fixtures::lobby_in_play();
        let mut player = fixtures::player_in(&lobby);
        player.set_actions(turn_slots());
        let merchant = fixtures::character(&catalog, "Merchant");

        let mut lobbies = MockLobbyRepo::new();
        lobbies
            .expect_update_card_deck()
            .withf(|_, deck| deck.len() == 3)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut players = MockPlayerRepo::new();
        players
            .expect_update_quarter_hand()
            .withf(|_, hand| hand.len() == 2)
            .times(1)
            .returning(|_, _| Ok(()));
        // coins_per_turn / 2 = 1 bonus coin
        players
            .expect_update_coins()
            .withf(|_, coins| *coins == 1)
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_game_actions()
            .withf(|_, actions| !actions.offers(GameAction::TakeResources))
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_menu_messages()
            .returning(|_, _| Ok(()));

        let mut gateway = MockMessagingGateway::new();
        gateway
            .expect_send_card_images()
            .withf(|_, cards| cards.len() == 2)
            .times(1)
            .returning(|_, _| Ok(()));
        gateway
            .expect_send_keyboard()
            .returning(|_, _, _| Ok(MessageId::new(9)));

        let use_case = use_case(lobbies, players, gateway);
        use_case
            .execute(fixtures::ctx(lobby, player, merchant), ResourceKind::Card, 2)
            .await
            .expect("card take succeeds");
    }

    #[tokio::test]
    async fn architect_coin_take_draws_extra_cards() {
        let catalog = fixtures::catalog();
        let lobby = fixtures::lobby_in_play();
        let mut player = fixtures::player_in(&lobby);
        player.set_actions(turn_slots());
        let architect = fixtures::character(&catalog, "Architect");

        let mut lobbies = MockLobbyRepo::new();
        lobbies
            .expect_update_card_deck()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut players = MockPlayerRepo::new();
        // 2 x quarters_per_turn = 2 extra cards
        players
            .expect_update_quarter_hand()
            .withf(|_, hand| hand.len() == 2)
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_coins()
            .withf(|_, coins| *coins == 2)
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_game_actions()
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_menu_messages()
            .returning(|_, _| Ok(()));

        let mut gateway = MockMessagingGateway::new();
        gateway
            .expect_send_card_images()
            .times(1)
            .returning(|_, _| Ok(()));
        gateway
            .expect_send_keyboard()
            .returning(|_, _, _| Ok(MessageId::new(9)));

        let use_case = use_case(lobbies, players, gateway);
        use_case
            .execute(
                fixtures::ctx(lobby, player, architect),
                ResourceKind::Coin,
                2,
            )
            .await
            .expect("coin take succeeds");
    }

    #[tokio::test]
    async fn plain_coin_take_touches_no_deck() {
        let catalog = fixtures::catalog();
        let lobby = fixtures::lobby_in_play();
        let mut player = fixtures::player_in(&lobby);
        player.set_actions(turn_slots());
        let king = fixtures::character(&catalog, "King");

        let mut players = MockPlayerRepo::new();
        players
            .expect_update_coins()
            .withf(|_, coins| *coins == 2)
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_game_actions()
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_menu_messages()
            .returning(|_, _| Ok(()));

        let mut gateway = MockMessagingGateway::new();
        gateway
            .expect_send_keyboard()
            .returning(|_, _, _| Ok(MessageId::new(9)));

        // No update_card_deck expectation: the deck must not be touched.
        let use_case = use_case(MockLobbyRepo::new(), players, gateway);
        use_case
            .execute(fixtures::ctx(lobby, player, king), ResourceKind::Coin, 2)
            .await
            .expect("plain coin take succeeds");
    }
}
