//! The action resolver: single entry point for inbound action events.
//!
//! Every event is an independent unit of work. The resolver reconstructs
//! legality from persisted state: fetch both aggregates, verify the token
//! against the player's eligibility set, join the acting character with
//! its catalog definition, then dispatch to the per-kind use case.

use std::str::FromStr;
use std::sync::Arc;

use citadels_domain::{
    Catalog, CharacterName, ChatId, GameAction, GameSettings, LobbyId, MessageId, Player, PlayerId,
    QuarterName,
};

use crate::infrastructure::ports::{LobbyRepo, MessagingGateway, PlayerRepo, TurnOrchestrator};

use super::build_quarter::BuildQuarter;
use super::character_effect::ApplyCharacterEffect;
use super::choose_character::ChooseCharacter;
use super::destroy_quarters::DestroyQuarters;
use super::discard_quarters::DiscardQuarters;
use super::end_turn::EndTurn;
use super::error::{ActionError, IllegalAction};
use super::exchange_hands::ExchangeHands;
use super::take_resources::{ResourceKind, TakeResources};
use super::take_revenue::TakeRevenue;
use super::ActionContext;

/// How the inbound event identifies the acting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerRef {
    Id(PlayerId),
    Chat(ChatId),
}

/// Typed arguments accompanying an action token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionArgs {
    None,
    Resource { kind: ResourceKind, amount: u32 },
    Quarter { name: QuarterName },
    Character { name: CharacterName },
    Player { id: PlayerId },
    DestroyTarget {
        player: PlayerId,
        quarter: Option<QuarterName>,
    },
    /// Discard one quarter, or signal "done" with `None`.
    Discard { quarter: Option<QuarterName> },
}

/// One inbound action event, as decoded by the event router.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub lobby: LobbyId,
    pub player: PlayerRef,
    /// The acting character (for ChooseCharacter, the one being claimed).
    pub character: CharacterName,
    pub token: String,
    pub args: ActionArgs,
}

/// Dispatches inbound action events to their handlers.
///
/// Built once at startup; holds no per-event state, so events for
/// different players resolve fully in parallel.
pub struct ActionResolver {
    lobbies: Arc<dyn LobbyRepo>,
    players: Arc<dyn PlayerRepo>,
    gateway: Arc<dyn MessagingGateway>,
    catalog: Arc<Catalog>,
    choose_character: ChooseCharacter,
    take_resources: TakeResources,
    build_quarter: BuildQuarter,
    character_effect: ApplyCharacterEffect,
    exchange_hands: ExchangeHands,
    discard_quarters: DiscardQuarters,
    destroy_quarters: DestroyQuarters,
    take_revenue: TakeRevenue,
    end_turn: EndTurn,
}

impl ActionResolver {
    pub fn new(
        lobbies: Arc<dyn LobbyRepo>,
        players: Arc<dyn PlayerRepo>,
        gateway: Arc<dyn MessagingGateway>,
        orchestrator: Arc<dyn TurnOrchestrator>,
        catalog: Arc<Catalog>,
        settings: GameSettings,
    ) -> Self {
        Self {
            choose_character: ChooseCharacter::new(
                Arc::clone(&lobbies),
                Arc::clone(&players),
                Arc::clone(&gateway),
                Arc::clone(&orchestrator),
            ),
            take_resources: TakeResources::new(
                Arc::clone(&lobbies),
                Arc::clone(&players),
                Arc::clone(&gateway),
                Arc::clone(&catalog),
                settings.clone(),
            ),
            build_quarter: BuildQuarter::new(
                Arc::clone(&lobbies),
                Arc::clone(&players),
                Arc::clone(&gateway),
                Arc::clone(&catalog),
                settings.clone(),
            ),
            character_effect: ApplyCharacterEffect::new(
                Arc::clone(&lobbies),
                Arc::clone(&players),
                Arc::clone(&gateway),
                Arc::clone(&catalog),
            ),
            exchange_hands: ExchangeHands::new(
                Arc::clone(&players),
                Arc::clone(&gateway),
                Arc::clone(&catalog),
            ),
            discard_quarters: DiscardQuarters::new(
                Arc::clone(&lobbies),
                Arc::clone(&players),
                Arc::clone(&gateway),
                Arc::clone(&catalog),
            ),
            destroy_quarters: DestroyQuarters::new(
                Arc::clone(&players),
                Arc::clone(&gateway),
                Arc::clone(&catalog),
                settings,
            ),
            take_revenue: TakeRevenue::new(
                Arc::clone(&players),
                Arc::clone(&gateway),
                Arc::clone(&catalog),
            ),
            end_turn: EndTurn::new(
                Arc::clone(&lobbies),
                Arc::clone(&players),
                Arc::clone(&gateway),
                orchestrator,
            ),
            lobbies,
            players,
            gateway,
            catalog,
        }
    }

    /// Resolves one action event.
    ///
    /// Illegal actions are surfaced to the player as a single replaceable
    /// inline message before the error is returned; the caller logs it and
    /// keeps its dispatch loop alive.
    pub async fn resolve(&self, request: ActionRequest) -> Result<(), ActionError> {
        let player = self.fetch_player(request.player).await?;
        let notice = NoticeTarget {
            id: player.id(),
            chat: player.chat(),
            error_message: player.error_message(),
        };

        let result = self.resolve_inner(request, player).await;
        if let Err(ActionError::Illegal(ref illegal)) = result {
            self.report_illegal(&notice, illegal).await;
        }
        result
    }

    async fn resolve_inner(
        &self,
        request: ActionRequest,
        player: Player,
    ) -> Result<(), ActionError> {
        let Some(lobby) = self.lobbies.get(request.lobby).await? else {
            // The lobby may have been deleted concurrently.
            if let Err(e) = self
                .gateway
                .send_message(player.chat(), "Too late, this game no longer exists.")
                .await
            {
                tracing::warn!(player = %player.id(), error = %e, "failed to send lobby-gone notice");
            }
            return Err(ActionError::LobbyGone);
        };

        let action = GameAction::from_str(&request.token)
            .map_err(|_| IllegalAction::UnknownToken(request.token.clone()))?;
        if !player.actions().offers(action) {
            return Err(IllegalAction::NotEligible.into());
        }

        let character = self.catalog.character(&request.character)?.clone();
        let ctx = ActionContext {
            lobby,
            player,
            character,
        };

        match (action, request.args) {
            (GameAction::ChooseCharacter, ActionArgs::None) => {
                self.choose_character.execute(ctx).await
            }
            (GameAction::TakeResources, ActionArgs::Resource { kind, amount }) => {
                self.take_resources.execute(ctx, kind, amount).await
            }
            (GameAction::Build, ActionArgs::Quarter { name }) => {
                self.build_quarter.execute(ctx, name).await
            }
            (GameAction::Kill, ActionArgs::None) => {
                self.character_effect.execute(ctx, action, None).await
            }
            (GameAction::Kill, ActionArgs::Character { name }) => {
                self.character_effect.execute(ctx, action, Some(name)).await
            }
            (GameAction::Steal, ActionArgs::None) => {
                self.character_effect.execute(ctx, action, None).await
            }
            (GameAction::Steal, ActionArgs::Character { name }) => {
                self.character_effect.execute(ctx, action, Some(name)).await
            }
            (GameAction::ExchangeHands, ActionArgs::Player { id }) => {
                self.exchange_hands.execute(ctx, id).await
            }
            (GameAction::DiscardQuarters, ActionArgs::Discard { quarter }) => {
                self.discard_quarters.execute(ctx, quarter).await
            }
            (GameAction::Destroy, ActionArgs::DestroyTarget { player, quarter }) => {
                self.destroy_quarters.execute(ctx, player, quarter).await
            }
            (GameAction::TakeRevenue, ActionArgs::None) => self.take_revenue.execute(ctx).await,
            (GameAction::EndTurn, ActionArgs::None) => self.end_turn.execute(ctx).await,
            _ => Err(IllegalAction::MissingArgument.into()),
        }
    }

    async fn fetch_player(&self, player: PlayerRef) -> Result<Player, ActionError> {
        let found = match player {
            PlayerRef::Id(id) => self.players.get(id).await?,
            PlayerRef::Chat(chat) => self.players.get_by_chat(chat).await?,
        };
        found.ok_or(ActionError::PlayerNotFound)
    }

    /// Edits the player's single inline error message in place, or sends a
    /// fresh one. Best-effort on the gateway side; the new message id is
    /// persisted so the next illegal action replaces it.
    async fn report_illegal(&self, notice: &NoticeTarget, illegal: &IllegalAction) {
        let text = illegal.to_string();
        match self
            .gateway
            .edit_or_resend(notice.chat, notice.error_message, &text)
            .await
        {
            Ok(id) => {
                if notice.error_message != Some(id) {
                    if let Err(e) = self.players.update_error_message(notice.id, Some(id)).await {
                        tracing::warn!(player = %notice.id, error = %e, "failed to persist error message id");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(player = %notice.id, error = %e, "failed to surface illegal action");
            }
        }
    }
}

struct NoticeTarget {
    id: PlayerId,
    chat: ChatId,
    error_message: Option<MessageId>,
}
