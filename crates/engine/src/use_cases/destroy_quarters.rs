//! Destroy quarters use case.
//!
//! Two-phase: the first call lists the target's destroyable quarters, the
//! second applies one destruction. Candidates are re-derived from persisted
//! state on the second call, so a duplicate confirmation after the quarter
//! is gone resolves as an invalid target instead of double-charging.

use std::sync::Arc;

use citadels_domain::{economy, Catalog, GameAction, GameSettings, Player, PlayerId, QuarterName};

use crate::infrastructure::ports::{Keyboard, KeyboardButton, MessagingGateway, PlayerRepo};

use super::eligibility;
use super::error::{ActionError, IllegalAction};
use super::ActionContext;

pub struct DestroyQuarters {
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    catalog: Arc<Catalog>,
    settings: GameSettings,
}

impl DestroyQuarters {
    pub fn new(
        players: Arc<dyn PlayerRepo>,
        gateway: Arc<dyn MessagingGateway>,
        catalog: Arc<Catalog>,
        settings: GameSettings,
    ) -> Self {
        Self {
            players,
            gateway,
            catalog,
            settings,
        }
    }

    pub async fn execute(
        &self,
        ctx: ActionContext,
        target_id: PlayerId,
        quarter: Option<QuarterName>,
    ) -> Result<(), ActionError> {
        if target_id == ctx.player.id() {
            return Err(IllegalAction::InvalidTarget.into());
        }
        let target = self
            .players
            .get(target_id)
            .await?
            .ok_or(IllegalAction::InvalidTarget)?;
        if target.lobby_id() != ctx.lobby.id() {
            return Err(IllegalAction::InvalidTarget.into());
        }

        // Completed cities are permanently protected; candidates also obey
        // the affordability rule (cost <= coins + 1).
        let candidates = economy::destroy_candidates(
            &target,
            ctx.player.coins(),
            &self.catalog,
            &self.settings,
        )?;

        match quarter {
            None => self.list_candidates(ctx, target_id, candidates).await,
            Some(name) => self.destroy(ctx, target, candidates, name).await,
        }
    }

    async fn list_candidates(
        &self,
        ctx: ActionContext,
        target_id: PlayerId,
        candidates: Vec<(QuarterName, u32)>,
    ) -> Result<(), ActionError> {
        if candidates.is_empty() {
            return Err(IllegalAction::NothingToDestroy.into());
        }

        let mut player = ctx.player;

        let mut keyboard = Keyboard::new();
        for (name, cost) in candidates {
            let label = format!("{name} ({cost} coins)");
            let token = format!("destroy:{target_id}:{name}");
            keyboard = keyboard.row(vec![KeyboardButton::new(label, token)]);
        }
        // The sent keyboard joins the menu bookkeeping so the next
        // refresh_menu can delete it.
        match self
            .gateway
            .send_keyboard(player.chat(), "Destroy which quarter?", keyboard)
            .await
        {
            Ok(id) => {
                player.push_menu_message(id);
                self.players
                    .update_menu_messages(player.id(), player.menu_messages())
                    .await?;
            }
            Err(e) => {
                tracing::warn!(player = %player.id(), error = %e, "failed to send destroy keyboard");
            }
        }
        Ok(())
    }

    async fn destroy(
        &self,
        ctx: ActionContext,
        mut target: Player,
        candidates: Vec<(QuarterName, u32)>,
        name: QuarterName,
    ) -> Result<(), ActionError> {
        let ActionContext {
            lobby: _,
            mut player,
            character,
        } = ctx;

        let Some((_, cost)) = candidates.into_iter().find(|(n, _)| *n == name) else {
            return Err(IllegalAction::InvalidTarget.into());
        };

        player.debit_coins(cost)?;
        let placed = target.remove_placed(&name)?;
        let def = self.catalog.quarter(&name)?;
        target.deduct_score(economy::placed_value(def, placed.bonus));
        player.actions_mut().remove(GameAction::Destroy);

        self.players.update_coins(player.id(), player.coins()).await?;
        self.players
            .update_game_actions(player.id(), player.actions())
            .await?;
        self.players
            .update_placed_quarters(target.id(), target.placed_quarters())
            .await?;
        self.players.update_score(target.id(), target.score()).await?;

        let notice = format!("Your {name} was destroyed!");
        if let Err(e) = self.gateway.send_message(target.chat(), &notice).await {
            tracing::warn!(player = %target.id(), error = %e, "failed to notify destroy target");
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
    use crate::infrastructure::ports::{MockMessagingGateway, MockPlayerRepo};
    use crate::use_cases::fixtures;
    use citadels_domain::{ActionSlot, GameActions, MessageId};

    fn destroy_slots() -> GameActions {
        GameActions::new(vec![
            ActionSlot::Single(GameAction::Destroy),
            ActionSlot::Single(GameAction::EndTurn),
        ])
    }

    fn use_case_with_settings(
        players: MockPlayerRepo,
        gateway: MockMessagingGateway,
        settings: GameSettings,
    ) -> DestroyQuarters {
        DestroyQuarters::new(
            Arc::new(players),
            Arc::new(gateway),
            Arc::new(fixtures::catalog()),
            settings,
        )
    }

    fn use_case(players: MockPlayerRepo, gateway: MockMessagingGateway) -> DestroyQuarters {
        use_case_with_settings(players, gateway, fixtures::settings())
    }

    #[tokio::test]
    async fn listing_offers_only_affordable_quarters() {
        let catalog = fixtures::catalog();
        let lobby = fixtures::lobby_in_play();
        let mut player = fixtures::player_in(&lobby);
        player.credit_coins(2);
        player.set_actions(destroy_slots());
        let warlord = fixtures::character(&catalog, "Warlord");

        let mut target = fixtures::player_with_chat(&lobby, 200);
        target
            .place_quarter(fixtures::quarter("Tavern"), 0)
            .expect("unique");
        target
            .place_quarter(fixtures::quarter("Cathedral"), 0)
            .expect("unique");
        let target_id = target.id();

        let mut players = MockPlayerRepo::new();
        players
            .expect_get()
            .returning(move |_| Ok(Some(target.clone())));

        players
            .expect_update_menu_messages()
            .withf(|_, messages| messages.len() == 1 && messages[0] == MessageId::new(3))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut gateway = MockMessagingGateway::new();
        gateway
            .expect_send_keyboard()
            .withf(|_, _, keyboard| {
                // Cathedral costs 5 > coins + 1, so only the Tavern shows.
                keyboard.rows.len() == 1 && keyboard.rows[0][0].label.starts_with("Tavern")
            })
            .times(1)
            .returning(|_, _, _| Ok(MessageId::new(3)));

        let use_case = use_case(players, gateway);
        use_case
            .execute(fixtures::ctx(lobby, player, warlord), target_id, None)
            .await
            .expect("listing succeeds");
    }

    #[tokio::test]
    async fn completed_city_lists_nothing() {
        let catalog = fixtures::catalog();
        let settings = GameSettings {
            quarters_to_win: 2,
            ..fixtures::settings()
        };
        let lobby = fixtures::lobby_in_play();
        let mut player = fixtures::player_in(&lobby);
        player.credit_coins(100);
        player.set_actions(destroy_slots());
        let warlord = fixtures::character(&catalog, "Warlord");

        let mut target = fixtures::player_with_chat(&lobby, 200);
        target
            .place_quarter(fixtures::quarter("Tavern"), 0)
            .expect("unique");
        target
            .place_quarter(fixtures::quarter("Market"), 0)
            .expect("unique");
        let target_id = target.id();

        let mut players = MockPlayerRepo::new();
        players
            .expect_get()
            .returning(move |_| Ok(Some(target.clone())));

        let use_case = use_case_with_settings(players, MockMessagingGateway::new(), settings);
        let result = use_case
            .execute(fixtures::ctx(lobby, player, warlord), target_id, None)
            .await;
        assert!(matches!(
            result,
            Err(ActionError::Illegal(IllegalAction::NothingToDestroy))
        ));
    }

    #[tokio::test]
    async fn unaffordable_quarter_is_invalid_target() {
        let catalog = fixtures::catalog();
        let lobby = fixtures::lobby_in_play();
        let mut player = fixtures::player_in(&lobby);
        player.credit_coins(4);
        player.set_actions(destroy_slots());
        let warlord = fixtures::character(&catalog, "Warlord");

        let mut target = fixtures::player_with_chat(&lobby, 200);
        target
            .place_quarter(fixtures::quarter("Dragon Gate"), 2)
            .expect("unique");
        target.add_score(8);
        let target_id = target.id();

        let mut players = MockPlayerRepo::new();
        players
            .expect_get()
            .returning(move |_| Ok(Some(target.clone())));

        // Dragon Gate costs 6 > coins + 1, so it never made the candidate list.
        let use_case = use_case(players, MockMessagingGateway::new());
        let result = use_case
            .execute(
                fixtures::ctx(lobby, player, warlord),
                target_id,
                Some(fixtures::quarter("Dragon Gate")),
            )
            .await;
        assert!(matches!(
            result,
            Err(ActionError::Illegal(IllegalAction::InvalidTarget))
        ));
    }

    #[tokio::test]
    async fn two_phase_destroy_applies_full_arithmetic() {
        let catalog = fixtures::catalog();
        let lobby = fixtures::lobby_in_play();
        let mut player = fixtures::player_in(&lobby);
        player.credit_coins(4);
        player.set_actions(destroy_slots());
        let warlord = fixtures::character(&catalog, "Warlord");
        let actor_id = player.id();

        let mut target = fixtures::player_with_chat(&lobby, 200);
        target
            .place_quarter(fixtures::quarter("Keep"), 0)
            .expect("unique");
        target
            .place_quarter(fixtures::quarter("Tavern"), 0)
            .expect("unique");
        target.add_score(4);
        let target_id = target.id();

        let mut players = MockPlayerRepo::new();
        players
            .expect_get()
            .returning(move |_| Ok(Some(target.clone())));
        // Keep costs 3: actor pays 2, target loses the full 3.
        players
            .expect_update_coins()
            .withf(move |id, coins| *id == actor_id && *coins == 2)
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_game_actions()
            .withf(|_, actions| !actions.offers(GameAction::Destroy))
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_placed_quarters()
            .withf(move |id, placed| {
                *id == target_id && placed.len() == 1 && placed[0].name.as_str() == "Tavern"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_score()
            .withf(move |id, score| *id == target_id && *score == 1)
            .times(1)
            .returning(|_, _| Ok(()));
        players
            .expect_update_menu_messages()
            .returning(|_, _| Ok(()));

        let mut gateway = MockMessagingGateway::new();
        gateway
            .expect_send_message()
            .withf(|_, text| text.contains("Keep"))
            .times(1)
            .returning(|_, _| Ok(MessageId::new(7)));
        gateway
            .expect_send_keyboard()
            .returning(|_, _, _| Ok(MessageId::new(8)));

        let use_case = use_case(players, gateway);
        use_case
            .execute(
                fixtures::ctx(lobby, player, warlord),
                target_id,
                Some(fixtures::quarter("Keep")),
            )
            .await
            .expect("destroy succeeds");
    }

    #[tokio::test]
    async fn duplicate_confirmation_is_rejected_not_recharged() {
        let catalog = fixtures::catalog();
        let lobby = fixtures::lobby_in_play();
        let mut player = fixtures::player_in(&lobby);
        player.credit_coins(4);
        player.set_actions(destroy_slots());
        let warlord = fixtures::character(&catalog, "Warlord");

        // The quarter is already gone from the persisted target.
        let target = fixtures::player_with_chat(&lobby, 200);
        let target_id = target.id();

        let mut players = MockPlayerRepo::new();
        players
            .expect_get()
            .returning(move |_| Ok(Some(target.clone())));

        let use_case = use_case(players, MockMessagingGateway::new());
        let result = use_case
            .execute(
                fixtures::ctx(lobby, player, warlord),
                target_id,
                Some(fixtures::quarter("Keep")),
            )
            .await;
        assert!(matches!(
            result,
            Err(ActionError::Illegal(IllegalAction::InvalidTarget))
        ));
    }
}
