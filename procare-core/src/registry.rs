//! Danh sách card để bộ chọn card của host tìm thấy.

use serde::{Deserialize, Serialize};

use crate::card::CARD_TYPE;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardDescriptor {
    #[serde(rename = "type")]
    pub card_type: String,
    pub name: String,
    pub description: String,
}

impl CardDescriptor {
    pub fn procare_timeline() -> Self {
        Self {
            card_type: CARD_TYPE.to_string(),
            name: "Procare Timeline Card".to_string(),
            description: "A timeline card to display Procare activities.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    Unchanged,
    /// Cùng `type` nhưng mô tả khác: thay tại chỗ.
    Replaced,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardRegistry {
    cards: Vec<CardDescriptor>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Đăng ký card. Gọi lại với cùng mô tả không thay đổi gì.
    pub fn register(&mut self, descriptor: CardDescriptor) -> Registration {
        match self
            .cards
            .iter_mut()
            .find(|card| card.card_type == descriptor.card_type)
        {
            Some(existing) if *existing == descriptor => Registration::Unchanged,
            Some(existing) => {
                *existing = descriptor;
                Registration::Replaced
            }
            None => {
                self.cards.push(descriptor);
                Registration::Added
            }
        }
    }

    pub fn cards(&self) -> &[CardDescriptor] {
        &self.cards
    }

    pub fn find(&self, card_type: &str) -> Option<&CardDescriptor> {
        self.cards.iter().find(|card| card.card_type == card_type)
    }
}
