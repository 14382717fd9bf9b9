//! Static catalog of what the app can generate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssistantType {
    #[default]
    Creative,
    Practical,
}

impl AssistantType {
    pub const ALL: [AssistantType; 2] = [AssistantType::Creative, AssistantType::Practical];

    /// Feature kinds offered under this category, in display order.
    pub fn features(self) -> &'static [FeatureKind] {
        match self {
            AssistantType::Creative => &CREATIVE_FEATURES,
            AssistantType::Practical => &PRACTICAL_FEATURES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssistantType::Creative => "✍️ Tác giả Sáng tạo",
            AssistantType::Practical => "🧠 Cố vấn Thực tế",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureKind {
    Message,
    Poem,
    Game,
    Health,
    Finance,
    Life,
    Study,
    FengShui,
    Spirituality,
}

pub const CREATIVE_FEATURES: [FeatureKind; 3] =
    [FeatureKind::Message, FeatureKind::Poem, FeatureKind::Game];

pub const PRACTICAL_FEATURES: [FeatureKind; 6] = [
    FeatureKind::Health,
    FeatureKind::Finance,
    FeatureKind::Life,
    FeatureKind::Study,
    FeatureKind::FengShui,
    FeatureKind::Spirituality,
];

impl FeatureKind {
    pub const ALL: [FeatureKind; 9] = [
        FeatureKind::Message,
        FeatureKind::Poem,
        FeatureKind::Game,
        FeatureKind::Health,
        FeatureKind::Finance,
        FeatureKind::Life,
        FeatureKind::Study,
        FeatureKind::FengShui,
        FeatureKind::Spirituality,
    ];

    pub fn category(self) -> AssistantType {
        match self {
            FeatureKind::Message | FeatureKind::Poem | FeatureKind::Game => {
                AssistantType::Creative
            }
            _ => AssistantType::Practical,
        }
    }

    pub fn is_creative(self) -> bool {
        self.category() == AssistantType::Creative
    }

    /// Stable identifier used on the wire and on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            FeatureKind::Message => "message",
            FeatureKind::Poem => "poem",
            FeatureKind::Game => "game",
            FeatureKind::Health => "health",
            FeatureKind::Finance => "finance",
            FeatureKind::Life => "life",
            FeatureKind::Study => "study",
            FeatureKind::FengShui => "feng-shui",
            FeatureKind::Spirituality => "spirituality",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    /// Tab label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            FeatureKind::Message => "Tin nhắn Yêu thương",
            FeatureKind::Poem => "Nhà thơ Tình yêu",
            FeatureKind::Game => "Người tạo Game Vui",
            FeatureKind::Health => "Tư vấn Sức khỏe",
            FeatureKind::Finance => "Hướng dẫn Tài chính",
            FeatureKind::Life => "Tư vấn Cuộc sống",
            FeatureKind::Study => "Hỗ trợ Học tập",
            FeatureKind::FengShui => "Khám phá Phong thủy",
            FeatureKind::Spirituality => "Góc nhìn Tâm linh",
        }
    }

    /// Result title for practical features. Creative titles come from the reply.
    pub fn default_title(self) -> &'static str {
        match self {
            FeatureKind::Health
            | FeatureKind::Finance
            | FeatureKind::Life
            | FeatureKind::Study
            | FeatureKind::FengShui
            | FeatureKind::Spirituality => self.label(),
            _ => "Thông tin cho bạn",
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            FeatureKind::Message => "✨ Tạo tin nhắn diệu kỳ ✨",
            FeatureKind::Poem => "✒️ Sáng tác thơ tình ✒️",
            FeatureKind::Game => "🎲 Tạo game vui 🎲",
            FeatureKind::Health => "🩺 Nhận tư vấn sức khỏe 🩺",
            FeatureKind::Finance => "💰 Tra cứu thông tin tài chính 💰",
            FeatureKind::Life => "🌱 Nhận lời khuyên cuộc sống 🌱",
            FeatureKind::Study => "📚 Hỗ trợ học tập 📚",
            FeatureKind::FengShui => "☯️ Khám phá phong thủy ☯️",
            FeatureKind::Spirituality => "🧘 Khám phá tâm linh 🧘",
        }
    }

    /// Example question shown in the practical query box.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            FeatureKind::Health => Some("Ví dụ: Làm thế nào để giảm stress hiệu quả?"),
            FeatureKind::Finance => {
                Some("Ví dụ: Lãi suất tiết kiệm của các ngân hàng hiện nay?")
            }
            FeatureKind::Life => Some("Ví dụ: Cách để cân bằng giữa công việc và cuộc sống?"),
            FeatureKind::Study => Some("Ví dụ: Giải thích về thuyết tương đối của Einstein."),
            FeatureKind::FengShui => {
                Some("Ví dụ: Làm sao để bố trí phòng ngủ hợp phong thủy?")
            }
            FeatureKind::Spirituality => Some("Ví dụ: Thiền định là gì và lợi ích của nó?"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    #[default]
    GoodMorning,
    GoodNight,
    ThinkingOfYou,
    Apology,
    Encouragement,
    Congratulations,
    PlayfulTeasing,
}

impl MessageType {
    pub const ALL: [MessageType; 7] = [
        MessageType::GoodMorning,
        MessageType::GoodNight,
        MessageType::ThinkingOfYou,
        MessageType::Apology,
        MessageType::Encouragement,
        MessageType::Congratulations,
        MessageType::PlayfulTeasing,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            MessageType::GoodMorning => "good-morning",
            MessageType::GoodNight => "good-night",
            MessageType::ThinkingOfYou => "thinking-of-you",
            MessageType::Apology => "apology",
            MessageType::Encouragement => "encouragement",
            MessageType::Congratulations => "congratulations",
            MessageType::PlayfulTeasing => "playful-teasing",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    pub fn label(self) -> &'static str {
        match self {
            MessageType::GoodMorning => "Chúc buổi sáng",
            MessageType::GoodNight => "Chúc ngủ ngon",
            MessageType::ThinkingOfYou => "Đang nhớ em",
            MessageType::Apology => "Xin lỗi",
            MessageType::Encouragement => "Động viên, an ủi",
            MessageType::Congratulations => "Chúc mừng",
            MessageType::PlayfulTeasing => "Trêu ghẹo tinh nghịch",
        }
    }
}

/// Serializable view of the whole catalog, consumed by the page template and `/api/catalog`.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub assistant_types: Vec<CategoryEntry>,
    pub message_types: Vec<MessageTypeEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub id: AssistantType,
    pub label: &'static str,
    pub features: Vec<FeatureEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureEntry {
    pub id: FeatureKind,
    pub label: &'static str,
    pub button_label: &'static str,
    pub placeholder: Option<&'static str>,
    pub disclaimer: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageTypeEntry {
    pub id: MessageType,
    pub label: &'static str,
}

pub fn catalog() -> Catalog {
    let assistant_types = AssistantType::ALL
        .iter()
        .map(|&category| CategoryEntry {
            id: category,
            label: category.label(),
            features: category
                .features()
                .iter()
                .map(|&kind| FeatureEntry {
                    id: kind,
                    label: kind.label(),
                    button_label: kind.button_label(),
                    placeholder: kind.placeholder(),
                    disclaimer: crate::prompts::disclaimer(kind),
                })
                .collect(),
        })
        .collect();

    let message_types = MessageType::ALL
        .iter()
        .map(|&kind| MessageTypeEntry {
            id: kind,
            label: kind.label(),
        })
        .collect();

    Catalog {
        assistant_types,
        message_types,
    }
}
