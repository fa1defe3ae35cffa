//! Keyword lexicons used by the classifiers.
//!
//! Order matters wherever a table is scanned with first-match semantics.

use crate::matching::core::kinds::{InterestCategory, ViolationType};

/// Violation keywords in moderation priority order.
pub const VIOLATION_KEYWORDS: &[(ViolationType, &[&str])] = &[
    (ViolationType::Harassment, &["骚扰", "威胁", "恐吓", "侮辱", "谩骂"]),
    (ViolationType::Inappropriate, &["色情", "暴力", "血腥", "恐怖"]),
    (ViolationType::Spam, &["广告", "推广", "加微信", "加QQ", "刷单"]),
    (ViolationType::Sensitive, &["政治", "宗教", "种族"]),
];

/// Crisis-level distress keywords.
pub const RISK_KEYWORDS: &[&str] = &[
    "抑郁", "自杀", "绝望", "没有意义", "活不下去", "痛苦", "崩溃", "无助", "孤独", "失眠",
];

/// Everyday negative-emotion keywords.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "难过", "伤心", "焦虑", "压力", "烦恼", "困难", "问题", "担心", "害怕", "紧张",
];

/// Words signalling a reflective, in-depth message.
pub const DEPTH_KEYWORDS: &[&str] = &["为什么", "怎么", "如何", "原因", "想法", "感受", "经历"];

/// Positive polarity words for emotion sync.
pub const SYNC_POSITIVE_WORDS: &[&str] = &["好", "棒", "开心", "高兴", "喜欢", "感谢", "谢谢"];

/// Negative polarity words for emotion sync.
pub const SYNC_NEGATIVE_WORDS: &[&str] = &["难过", "伤心", "压力", "焦虑", "困难", "问题"];

/// Friendly words counted toward agreeableness.
pub const AGREEABLE_WORDS: &[&str] = &["好", "棒", "谢谢", "感谢", "喜欢", "开心"];

/// Planning words counted toward conscientiousness.
pub const PLANNING_WORDS: &[&str] = &["计划", "安排", "目标", "准备", "学习"];

/// Question marks, half- and full-width.
pub const QUESTION_MARKS: &[&str] = &["?", "？"];

/// Character class marking an expressive message.
pub const EXPRESSIVE_PATTERN: &str = "[！!😊😄😢😭]";

/// Interest keywords by category. Some keywords belong to several categories.
pub const INTEREST_KEYWORDS: &[(InterestCategory, &[&str])] = &[
    (
        InterestCategory::Academic,
        &[
            "考研", "学习", "算法", "编程", "数学", "物理", "化学", "英语", "论文", "科研",
            "数据结构", "机器学习",
        ],
    ),
    (
        InterestCategory::Career,
        &["实习", "工作", "面试", "简历", "职业", "公司", "创业", "项目", "技术创业"],
    ),
    (
        InterestCategory::Hobby,
        &[
            "音乐", "电影", "阅读", "运动", "游戏", "旅行", "摄影", "绘画", "书法", "舞蹈", "跑步",
        ],
    ),
    (
        InterestCategory::Sports,
        &["跑步", "篮球", "足球", "游泳", "健身", "瑜伽", "羽毛球", "乒乓球"],
    ),
    (
        InterestCategory::Entertainment,
        &["电影", "电视剧", "综艺", "动漫", "音乐", "演唱会", "话剧"],
    ),
];
