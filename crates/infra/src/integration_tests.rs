//! End-to-end tests over the on-disk stack.
//!
//! Tests: NewFood → FoodInventory → SqliteFoodStore / FsPhotoStore → FoodCard
//!
//! Verifies:
//! - Countdown text and freshness for records around today
//! - Records survive reopening the database, wherever the data dir lives
//! - Removal is idempotent, including two concurrent removals of one record
//! - Subscribers follow every published snapshot

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{Days, NaiveDate};

    use foodrecords_core::{FixedClock, FoodId};
    use foodrecords_inventory::{FoodInfo, Freshness, NewFood, format_date};

    use crate::config::AppConfig;
    use crate::inventory::FoodInventory;
    use crate::photos::{PhotoFormat, PhotoState, PhotoStore};

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn shifted(days: i64) -> String {
        let date = if days >= 0 {
            today().checked_add_days(Days::new(days as u64))
        } else {
            today().checked_sub_days(Days::new(days.unsigned_abs()))
        };
        format_date(date.unwrap())
    }

    /// A record expiring `days` from today with a matching 7-day shelf life.
    fn record(name: &str, days: i64) -> FoodInfo {
        FoodInfo {
            food_name: name.to_string(),
            production_date: shifted(days - 7),
            shelf_life: "7 days".to_string(),
            expiration_date: shifted(days),
            uuid: FoodId::new(),
            tips: String::new(),
            food_type: "Fridge".to_string(),
        }
    }

    async fn open(dir: &std::path::Path) -> FoodInventory {
        FoodInventory::open(&AppConfig::for_data_dir(dir))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn countdown_around_today() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = open(dir.path()).await;
        let clock = FixedClock::new(today());

        let u1 = record("Yogurt", 5);
        let u2 = record("Salad", -1);
        inventory.add(u1.clone()).await.unwrap();
        inventory.add(u2.clone()).await.unwrap();

        let cards: Vec<_> = inventory
            .cards(&clock)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(cards[0].id, u1.uuid);
        assert_eq!(cards[0].window.remaining_days, 5);
        assert_eq!(cards[0].window.freshness, Freshness::Valid);
        assert_eq!(cards[0].window.display, "5");

        assert_eq!(cards[1].id, u2.uuid);
        assert_eq!(cards[1].window.freshness, Freshness::Expired);
        assert_eq!(cards[1].window.display, "1");
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let created = {
            let inventory = open(dir.path()).await;
            inventory
                .create(NewFood {
                    food_name: "Kimchi".to_string(),
                    production_date: "2024-03-01".to_string(),
                    shelf_life: "1 month".to_string(),
                    tips: "keep the lid closed".to_string(),
                    food_type: "Ferments".to_string(),
                })
                .await
                .unwrap()
        };
        assert_eq!(created.expiration_date, "2024-04-01");

        let reopened = open(dir.path()).await;
        assert_eq!(reopened.snapshot().items(), std::slice::from_ref(&created));
    }

    #[tokio::test]
    async fn data_dir_with_url_characters_opens_the_right_file() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("50%off?mode=memory");
        let u1 = record("Yogurt", 5);

        open(&data_dir).await.add(u1.clone()).await.unwrap();

        assert!(data_dir.join("foodrecords.db").is_file());
        let reopened = open(&data_dir).await;
        assert_eq!(reopened.snapshot().items(), std::slice::from_ref(&u1));
    }

    #[tokio::test]
    async fn removing_twice_matches_removing_once() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = open(dir.path()).await;
        let u1 = record("Yogurt", 5);
        let u2 = record("Salad", -1);
        inventory.add(u1.clone()).await.unwrap();
        inventory.add(u2.clone()).await.unwrap();

        assert!(inventory.remove(&u1).await.unwrap());
        assert!(!inventory.remove(&u1).await.unwrap());

        assert_eq!(inventory.snapshot().items(), std::slice::from_ref(&u2));
        let reopened = open(dir.path()).await;
        assert_eq!(reopened.snapshot().items(), std::slice::from_ref(&u2));
    }

    #[tokio::test]
    async fn concurrent_removals_of_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = open(dir.path()).await;
        let u1 = record("Yogurt", 5);
        let u2 = record("Salad", -1);
        inventory.add(u1.clone()).await.unwrap();
        inventory.add(u2.clone()).await.unwrap();

        let photos = crate::photos::FsPhotoStore::new(&AppConfig::for_data_dir(dir.path()).photo_dir);
        let photo = photos.save(&u1.uuid, PNG).await.unwrap();

        let first = inventory.spawn_remove(u1.clone());
        let second = inventory.spawn_remove(u1.clone());
        let removed = [first.await.unwrap().unwrap(), second.await.unwrap().unwrap()];

        assert_eq!(removed.iter().filter(|r| **r).count(), 1);
        assert!(!photos.exists(&photo).await);
        assert_eq!(inventory.snapshot().items(), std::slice::from_ref(&u2));
    }

    #[tokio::test]
    async fn photo_state_follows_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::for_data_dir(dir.path());
        let inventory = FoodInventory::open(&config).await.unwrap();
        let u1 = record("Yogurt", 5);
        inventory.add(u1.clone()).await.unwrap();

        assert_eq!(inventory.spawn_load_photo(u1.uuid).await.unwrap(), PhotoState::Missing);

        let photos = crate::photos::FsPhotoStore::new(&config.photo_dir);
        photos.save(&u1.uuid, PNG).await.unwrap();
        match inventory.spawn_load_photo(u1.uuid).await.unwrap() {
            PhotoState::Ready(photo) => assert_eq!(photo.format, PhotoFormat::Png),
            PhotoState::Missing => panic!("photo should decode after save"),
        }

        inventory.remove(&u1).await.unwrap();
        assert!(!photos.exists(&photos.path_for(&u1.uuid)).await);
    }

    #[tokio::test]
    async fn subscriber_sees_each_snapshot_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = open(dir.path()).await;
        let sub = inventory.subscribe();
        let start = inventory.snapshot().version();

        let u1 = record("Yogurt", 5);
        let u2 = record("Salad", -1);
        inventory.add(u1.clone()).await.unwrap();
        inventory.add(u2.clone()).await.unwrap();
        inventory.remove(&u1).await.unwrap();

        let timeout = Duration::from_secs(1);
        let lens: Vec<_> = (0..3)
            .map(|_| sub.recv_timeout(timeout).unwrap())
            .map(|snapshot| (snapshot.version() - start, snapshot.len()))
            .collect();
        assert_eq!(lens, vec![(1, 1), (2, 2), (3, 1)]);
        assert!(sub.latest().is_none());
    }
}
