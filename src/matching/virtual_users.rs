//! Synthetic match candidates for sparse user pools.

use rand::Rng;
use tracing::{debug, info};

use crate::matching::core::config::VirtualUserConfig;
use crate::matching::core::ids::UserId;
use crate::matching::core::kinds::{InterestCategory, MbtiType, Scene};
use crate::matching::core::user_profile::UserProfile;

const NAMES: &[&str] = &["小明", "小红", "小刚", "小丽", "小华", "小芳", "小强", "小美"];
const SCHOOLS: &[&str] = &["清华大学", "北京大学", "复旦大学", "上海交通大学"];
const MAJORS: &[&str] = &["计算机科学", "软件工程", "数学", "物理", "化学", "经济学"];
const ACADEMIC_INTERESTS: &[&str] = &["考研", "学习", "算法", "编程", "数学", "英语"];
const CAREER_INTERESTS: &[&str] = &["软件工程师", "产品经理", "数据分析师", "研究员"];
const HOBBY_INTERESTS: &[&str] = &["阅读", "音乐", "运动", "电影", "旅行", "摄影"];
const REPLIES: &[&str] = &[
    "我也有类似的想法",
    "这个话题很有意思",
    "我们可以深入讨论一下",
    "你说得很有道理",
    "我也遇到过类似的情况",
];

/// Generates virtual users and decides how much they count in rankings.
#[derive(Clone, Debug)]
pub struct VirtualUserManager {
    config: VirtualUserConfig,
    virtual_users: Vec<UserProfile>,
    real_user_count: u64,
    weight: f64,
}

impl Default for VirtualUserManager {
    fn default() -> Self {
        Self::new(VirtualUserConfig::default())
    }
}

impl VirtualUserManager {
    /// Create a manager; the weight starts at the tier for zero real users.
    #[must_use]
    pub fn new(config: VirtualUserConfig) -> Self {
        let weight = config.weight_for(0);
        Self {
            config,
            virtual_users: Vec::new(),
            real_user_count: 0,
            weight,
        }
    }

    /// Generate a virtual user with random demographics and one interest
    /// per matchable category. The user is kept by the manager.
    pub fn generate_virtual_user<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        mbti_type: MbtiType,
        scene: Scene,
    ) -> UserProfile {
        let mut profile = UserProfile::new(UserId::new(), pick(rng, NAMES));
        profile.school = Some(pick(rng, SCHOOLS).to_string());
        profile.major = Some(pick(rng, MAJORS).to_string());
        profile.grade = Some(rng.gen_range(1..=4));
        profile.mbti_type = Some(mbti_type);
        profile.is_virtual = true;
        profile.scene_preference = Some(scene);

        profile.add_interests(InterestCategory::Academic, [pick(rng, ACADEMIC_INTERESTS)]);
        profile.add_interests(InterestCategory::Career, [pick(rng, CAREER_INTERESTS)]);
        profile.add_interests(InterestCategory::Hobby, [pick(rng, HOBBY_INTERESTS)]);

        debug!(user = %profile.user_id, %mbti_type, %scene, "virtual user generated");
        self.virtual_users.push(profile.clone());
        profile
    }

    /// Record the real-user population and recompute the virtual weight.
    pub fn update_virtual_user_weight(&mut self, real_user_count: u64) -> f64 {
        self.real_user_count = real_user_count;
        let weight = self.config.weight_for(real_user_count);
        if (weight - self.weight).abs() > f64::EPSILON {
            info!(
                real_users = real_user_count,
                from = self.weight,
                to = weight,
                "virtual user weight changed"
            );
        }
        self.weight = weight;
        weight
    }

    /// Current weight of virtual candidates.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Last reported real-user population.
    #[must_use]
    pub const fn real_user_count(&self) -> u64 {
        self.real_user_count
    }

    /// Virtual users generated so far.
    #[must_use]
    pub fn virtual_users(&self) -> &[UserProfile] {
        &self.virtual_users
    }

    /// A canned chat reply for a virtual user.
    #[must_use]
    pub fn simulate_reply<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        pick(rng, REPLIES)
    }
}

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool[rng.gen_range(0..pool.len())]
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_generated_user_draws_from_pools() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut manager = VirtualUserManager::default();
        for _ in 0..20 {
            let user = manager.generate_virtual_user(&mut rng, MbtiType::Enfp, Scene::Hobby);
            assert!(user.is_virtual);
            assert!(NAMES.contains(&user.username.as_str()));
            assert!(SCHOOLS.contains(&user.school.as_deref().unwrap()));
            assert!(MAJORS.contains(&user.major.as_deref().unwrap()));
            assert!((1..=4).contains(&user.grade.unwrap()));
            assert_eq!(user.mbti_type, Some(MbtiType::Enfp));
            assert_eq!(user.scene_preference, Some(Scene::Hobby));

            let interests = user.interests.as_ref().unwrap();
            assert_eq!(interests.len(), 3);
            assert!(ACADEMIC_INTERESTS.contains(&interests[&InterestCategory::Academic][0].as_str()));
            assert!(CAREER_INTERESTS.contains(&interests[&InterestCategory::Career][0].as_str()));
            assert!(HOBBY_INTERESTS.contains(&interests[&InterestCategory::Hobby][0].as_str()));
        }
        assert_eq!(manager.virtual_users().len(), 20);
    }

    #[test]
    fn test_same_seed_same_user() {
        let mut first = VirtualUserManager::default();
        let mut second = VirtualUserManager::default();
        let a =
            first.generate_virtual_user(&mut StdRng::seed_from_u64(42), MbtiType::Intj, Scene::Study);
        let b =
            second.generate_virtual_user(&mut StdRng::seed_from_u64(42), MbtiType::Intj, Scene::Study);
        assert_eq!(a.username, b.username);
        assert_eq!(a.school, b.school);
        assert_eq!(a.interests, b.interests);
        assert_ne!(a.user_id, b.user_id);
    }

    #[test]
    fn test_weight_tiers() {
        let mut manager = VirtualUserManager::default();
        assert!((manager.weight() - 1.0).abs() < f64::EPSILON);
        for (count, expected) in [
            (0, 1.0),
            (99, 1.0),
            (100, 0.5),
            (499, 0.5),
            (500, 0.2),
            (999, 0.2),
            (1000, 0.1),
            (50_000, 0.1),
        ] {
            let weight = manager.update_virtual_user_weight(count);
            assert!((weight - expected).abs() < f64::EPSILON, "count {count}");
            assert_eq!(manager.real_user_count(), count);
        }
    }

    #[test]
    fn test_simulated_reply_from_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let manager = VirtualUserManager::default();
        for _ in 0..10 {
            assert!(REPLIES.contains(&manager.simulate_reply(&mut rng)));
        }
    }
}
