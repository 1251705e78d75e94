//! Seed data: built-in words and users so the app is usable without a
//! configured Supabase project.

use crate::domain::{UserProfile, Word, WordStatus};

/// Fixed id for the single demo learner (no auth in this app).
pub const DEFAULT_USER_ID: &str = "00000000-0000-0000-0000-000000000001";

fn word(
  id: &str,
  text: &str,
  pronunciation: &str,
  meaning: &str,
  sentence_en: &str,
  sentence_cn: &str,
  mnemonic: &str,
) -> Word {
  Word {
    id: id.into(),
    word: text.into(),
    pronunciation: pronunciation.into(),
    meaning: meaning.into(),
    grammar: String::new(),
    grammar_tags: vec!["名词 (Noun)".into(), "可数名词".into()],
    sentence_en: sentence_en.into(),
    sentence_cn: sentence_cn.into(),
    scene_cn: String::new(),
    image_url: String::new(),
    mnemonic: Some(mnemonic.into()),
    level: "Lv.1 Beginner".into(),
    progress: 0,
    status: WordStatus::New,
    is_favorite: false,
  }
}

/// Minimal built-in word list for demo play.
pub fn seed_words() -> Vec<Word> {
  vec![
    word(
      "w-apple",
      "Apple",
      "/ˈæp.əl/",
      "n. 苹果。一种圆形的常见水果。",
      "I eat an apple every day.",
      "我每天吃一个苹果。",
      "【谐音法】读音像“阿婆”，想象阿婆在树下摘苹果。",
    ),
    word(
      "w-banana",
      "Banana",
      "/bəˈnɑː.nə/",
      "n. 香蕉。一种长形的热带水果。",
      "Bananas are rich in potassium.",
      "香蕉富含钾。",
      "【形似法】香蕉弯弯像月牙，B-a-n-a-n-a。",
    ),
    word(
      "w-cat",
      "Cat",
      "/kæt/",
      "n. 猫。一种家养小型哺乳动物。",
      "The cat is sleeping on the sofa.",
      "猫正在沙发上睡觉。",
      "【谐音法】读音像“开特”，开着特快列车去找小猫。",
    ),
  ]
}

/// The demo learner's starting record.
pub fn seed_user() -> UserProfile {
  UserProfile {
    id: DEFAULT_USER_ID.into(),
    name: "小小英雄 · 飞飞".into(),
    avatar: String::new(),
    level: 12,
    xp: 650,
    xp_max: 1000,
    stars: 1250,
    achievements: 3800,
    learned_words: 1250,
  }
}

/// Rival users so the seeded leaderboard is non-trivial.
pub fn seed_rivals() -> Vec<UserProfile> {
  let rival = |id: &str, name: &str, stars: u64| UserProfile {
    id: id.into(),
    name: name.into(),
    avatar: String::new(),
    level: 1,
    xp: 0,
    xp_max: 100,
    stars,
    achievements: 0,
    learned_words: 0,
  };
  vec![
    rival("u-champ", "冠军玩家", 2840),
    rival("u-tom", "小天才汤姆", 2450),
    rival("u-lucy", "快乐露西", 2120),
    rival("u-lele", "爱学习的乐乐", 1980),
    rival("u-bilingual", "双语小达人", 1850),
    rival("u-morning", "晨读之星", 1720),
  ]
}
