//! Per-feature persona, output schema and sampling settings, plus the user
//! prompt templates.

use serde_json::{json, Value};

use crate::features::FeatureKind;
use crate::request::GeneratorRequest;

/// Prefixed to every piece of model-authored content shown to the user.
pub const BRANDING_PREAMBLE: &str =
    "Đây là chatbot 'Gửi lời nhớ Nhung' do Trần Tuấn Thành (trantuanthanh.net) phát triển.\n\n";

const DISCLAIMER_DIRECTIVE: &str =
    "LUÔN LUÔN bắt đầu phần trả lời chính bằng câu sau trên một dòng riêng biệt:";

const SENSITIVE_TEMPERATURE: f64 = 0.3;
const DEFAULT_TEMPERATURE: f64 = 0.8;

/// Everything the generator needs to know about a feature before calling out.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureProfile {
    pub system_instruction: String,
    pub response_schema: Option<Value>,
    pub use_search: bool,
    pub temperature: f64,
}

/// Fixed sentence the model is told to open practical answers with.
pub fn disclaimer(kind: FeatureKind) -> Option<&'static str> {
    match kind {
        FeatureKind::Health => Some("Lưu ý: Thông tin này chỉ mang tính tham khảo. Bạn nên tham khảo ý kiến của bác sĩ hoặc chuyên gia y tế để được tư vấn chính xác."),
        FeatureKind::Finance => Some("Lưu ý: Thông tin này chỉ mang tính tham khảo và không phải là lời khuyên tài chính. Bạn nên tham khảo ý kiến của một chuyên gia tài chính chuyên nghiệp."),
        FeatureKind::Life => Some("Lưu ý: Đây là những góc nhìn dựa trên thông tin chung và không thay thế cho lời khuyên từ chuyên gia tư vấn tâm lý hoặc cuộc sống chuyên nghiệp."),
        FeatureKind::Study => Some("Lưu ý: Thông tin này dùng để tham khảo trong học tập. Hãy luôn đối chiếu với tài liệu và giáo trình chính thức của bạn."),
        FeatureKind::FengShui => Some("Lưu ý: Thông tin về phong thủy mang tính tham khảo và giải trí, dựa trên các niềm tin văn hóa. Đây không phải là khoa học đã được chứng minh."),
        FeatureKind::Spirituality => Some("Lưu ý: Các quan điểm về tâm linh rất đa dạng và mang tính cá nhân. Thông tin này chỉ nhằm mục đích tham khảo, không nhằm mục đích truyền bá tín ngưỡng."),
        FeatureKind::Message | FeatureKind::Poem | FeatureKind::Game => None,
    }
}

fn persona(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Message => "Cứ coi tớ là một người bạn thân chuyên gia 'quân sư' tình cảm nhé. Tớ sẽ giúp cậu viết những lời nhắn thật ngọt ngào, chân thành và độc đáo bằng tiếng Việt dựa trên thông tin được cung cấp. Giọng văn phải thật tự nhiên, như đang trò chuyện vậy, tránh sáo rỗng nhé.",
        FeatureKind::Poem => "Tớ sẽ là 'thi sĩ' riêng của cậu, giúp cậu gieo những vần thơ tình lãng mạn, giàu hình ảnh và chạm đến trái tim người ấy. Hãy cùng tạo ra một bài thơ thật đặc biệt nhé!",
        FeatureKind::Game => "Nào, chúng mình cùng nghĩ ra vài trò chơi nho nhỏ, vui ơi là vui cho hai cậu nhé! Để xem ai hiểu ai hơn nào. Tớ sẽ thiết kế những trò chơi đơn giản nhưng đầy gắn kết.",
        FeatureKind::Health => "Sau đó, với vai trò một người bạn AI, hãy chia sẻ thông tin về sức khỏe nhé. Nhưng nhớ này, tớ chỉ là một người bạn AI thôi, không thay thế được bác sĩ đâu.",
        FeatureKind::Finance => "Sau đó, với vai trò một người bạn AI, chuyện tiền nong à? Tớ có thể tìm thông tin giúp cậu, nhưng tớ không phải chuyên gia tài chính đâu nhé.",
        FeatureKind::Life => "Sau đó, cứ tâm sự với tớ nhé. Tớ sẽ lắng nghe và chia sẻ cùng cậu những góc nhìn về cuộc sống, như một người bạn thân vậy.",
        FeatureKind::Study => "Sau đó, học hành căng thẳng quá à? Để tớ giúp một tay! Tớ có thể giải thích các khái niệm khó nhằn một cách dễ hiểu hơn, như một người bạn cùng nhóm học tập vậy.",
        FeatureKind::FengShui => "Sau đó, phong thủy thú vị lắm đó! Để tớ chia sẻ vài thông tin hay ho cho cậu tham khảo và giải trí nhé.",
        FeatureKind::Spirituality => "Sau đó, tâm linh là một thế giới rộng lớn. Tớ sẽ cùng cậu khám phá các chủ đề này một cách khách quan và cởi mở, như hai người bạn cùng chia sẻ kiến thức.",
    }
}

/// System instruction for a feature. Shared by generation and the follow-up chat.
pub fn system_instruction(kind: FeatureKind) -> String {
    match disclaimer(kind) {
        Some(disclaimer) => format!(
            "{DISCLAIMER_DIRECTIVE} '{disclaimer}'\n\n{}",
            persona(kind)
        ),
        None => persona(kind).to_string(),
    }
}

fn starters_property(description: &str) -> Value {
    json!({
        "type": "ARRAY",
        "description": description,
        "items": { "type": "STRING" }
    })
}

fn response_schema(kind: FeatureKind) -> Option<Value> {
    let schema = match kind {
        FeatureKind::Message => json!({
            "type": "OBJECT",
            "properties": {
                "message": {
                    "type": "STRING",
                    "description": "Tin nhắn được cá nhân hóa, ngọt ngào và sáng tạo. Độ dài khoảng 3-5 câu."
                },
                "starters": starters_property("Một mảng chứa 3 câu hỏi gợi ý thông minh, tinh tế để bắt đầu cuộc trò chuyện.")
            },
            "propertyOrdering": ["message", "starters"]
        }),
        FeatureKind::Poem => json!({
            "type": "OBJECT",
            "properties": {
                "title": {
                    "type": "STRING",
                    "description": "Một tiêu đề bài thơ lãng mạn và phù hợp."
                },
                "poem": {
                    "type": "STRING",
                    "description": "Một bài thơ tình yêu ngắn (4-8 câu), giàu cảm xúc và hình ảnh, dựa trên các chi tiết được cung cấp."
                },
                "starters": starters_property("Một mảng chứa 3 câu hỏi gợi ý để bắt đầu cuộc trò chuyện liên quan đến bài thơ.")
            },
            "propertyOrdering": ["title", "poem", "starters"]
        }),
        FeatureKind::Game => json!({
            "type": "OBJECT",
            "properties": {
                "title": {
                    "type": "STRING",
                    "description": "Tên trò chơi vui nhộn và hấp dẫn."
                },
                "instructions": {
                    "type": "STRING",
                    "description": "Hướng dẫn cách chơi trò chơi một cách đơn giản, rõ ràng."
                },
                "openingLine": {
                    "type": "STRING",
                    "description": "Câu mở đầu để bắt đầu trò chơi."
                },
                "starters": starters_property("Một mảng chứa 3 câu hỏi gợi ý để thảo luận sau khi chơi.")
            },
            "propertyOrdering": ["title", "instructions", "openingLine", "starters"]
        }),
        _ => return None,
    };
    Some(schema)
}

/// Maps a feature to its generation settings.
pub fn select(kind: FeatureKind) -> FeatureProfile {
    let temperature = match kind {
        FeatureKind::Health | FeatureKind::Finance => SENSITIVE_TEMPERATURE,
        _ => DEFAULT_TEMPERATURE,
    };
    FeatureProfile {
        system_instruction: system_instruction(kind),
        response_schema: response_schema(kind),
        use_search: !kind.is_creative(),
        temperature,
    }
}

/// Interpolates the user's fields into the feature's prompt template.
pub fn build_prompt(request: &GeneratorRequest) -> String {
    match request {
        GeneratorRequest::Message {
            name,
            characteristics,
            message_type,
        } => format!(
            "Tạo một tin nhắn cho dịp '{}'. Tên cô ấy: {name}. Đặc điểm: {characteristics}.",
            message_type.label()
        ),
        GeneratorRequest::Poem {
            name,
            characteristics,
            poem_topic,
        } => format!(
            "Sáng tác một bài thơ tình yêu về chủ đề '{poem_topic}'. Tên cô ấy: {name}. Đặc điểm: {characteristics}."
        ),
        GeneratorRequest::Game {
            name,
            characteristics,
            game_idea,
        } => format!(
            "Tạo một trò chơi nhỏ vui vẻ cho các cặp đôi dựa trên ý tưởng: '{game_idea}'. Tên cô ấy: {name}. Đặc điểm: {characteristics}."
        ),
        GeneratorRequest::Health { query }
        | GeneratorRequest::Finance { query }
        | GeneratorRequest::Life { query }
        | GeneratorRequest::Study { query }
        | GeneratorRequest::FengShui { query }
        | GeneratorRequest::Spirituality { query } => query.clone(),
    }
}
