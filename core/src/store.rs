use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{StorageError, StoreError};
use crate::models::{clean_amount, Snapshot, Team, UserProfile, WeeklyRecord};
use crate::week::WeekId;

pub fn weekly_key(user_id: &str, week_id: &str) -> String {
    format!("users/{user_id}/weekly_distances/{week_id}")
}

pub fn profile_key(user_id: &str) -> String {
    format!("user_names/{user_id}")
}

pub fn team_key(team_id: &str) -> String {
    format!("teams/{team_id}")
}

/// Lesetilgang til brukere, poster og lag. Sendes inn eksplisitt til
/// skjermlaget; beregningene selv tar bare rene data.
pub trait RecordSource {
    fn user_ids(&self) -> Vec<String>;
    fn profile(&self, user_id: &str) -> Option<UserProfile>;
    fn weekly_records(&self, user_id: &str) -> Vec<WeeklyRecord>;
    fn teams(&self) -> Vec<(String, Team)>;

    fn team(&self, team_id: &str) -> Option<Team> {
        self.teams()
            .into_iter()
            .find(|(id, _)| id == team_id)
            .map(|(_, t)| t)
    }
}

impl RecordSource for Snapshot {
    fn user_ids(&self) -> Vec<String> {
        self.user_names.keys().cloned().collect()
    }

    fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.user_names.get(user_id).cloned()
    }

    fn weekly_records(&self, user_id: &str) -> Vec<WeeklyRecord> {
        self.records_for(user_id)
    }

    fn teams(&self) -> Vec<(String, Team)> {
        self.teams.iter().map(|(k, t)| (k.clone(), t.clone())).collect()
    }
}

/// Dokumentlager i minnet, nøklet på sti (`users/{uid}/weekly_distances/{weekId}` osv.).
/// Brukes som fixture og som lokal cache.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    docs: Arc<Mutex<BTreeMap<String, Value>>>,
}

fn decode<T: DeserializeOwned>(path: &str, doc: Value) -> Option<T> {
    match serde_json::from_value(doc) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("store: skipping unreadable document {path}: {e}");
            None
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn docs(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.docs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        self.docs().get(path).cloned()
    }

    pub fn set(&self, path: &str, doc: Value) {
        self.docs().insert(path.to_string(), doc);
    }

    /// Direkte barn av en samling, f.eks. `users/u1/weekly_distances`.
    pub fn query(&self, collection: &str) -> Vec<(String, Value)> {
        let prefix = format!("{}/", collection.trim_end_matches('/'));
        self.docs()
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter(|(k, _)| !k[prefix.len()..].contains('/'))
            .map(|(k, v)| (k[prefix.len()..].to_string(), v.clone()))
            .collect()
    }

    /// Sletter profil og alle ukeposter for en bruker.
    pub fn delete_user(&self, user_id: &str) {
        let weekly_prefix = format!("users/{user_id}/");
        let profile = profile_key(user_id);
        self.docs()
            .retain(|k, _| k != &profile && !k.starts_with(&weekly_prefix));
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, StorageError> {
        let encode = |what: &'static str, v: Result<Value, serde_json::Error>| {
            v.map_err(|source| StorageError::Serialize { what, source })
        };

        let store = Self::new();
        for (uid, profile) in &snapshot.user_names {
            store.set(&profile_key(uid), encode("profile", serde_json::to_value(profile))?);
        }
        for (uid, weeks) in &snapshot.weekly_distances {
            for (wid, rec) in weeks {
                store.set(&weekly_key(uid, wid), encode("weekly record", serde_json::to_value(rec))?);
            }
        }
        for (tid, team) in &snapshot.teams {
            store.set(&team_key(tid), encode("team", serde_json::to_value(team))?);
        }
        Ok(store)
    }

    pub fn to_snapshot(&self) -> Snapshot {
        let mut snap = Snapshot::default();
        for (path, doc) in self.docs().iter() {
            let parts: Vec<&str> = path.split('/').collect();
            match parts.as_slice() {
                ["user_names", uid] => {
                    if let Some(p) = decode(path, doc.clone()) {
                        snap.user_names.insert(uid.to_string(), p);
                    }
                }
                ["users", uid, "weekly_distances", wid] => {
                    if let Some(r) = decode(path, doc.clone()) {
                        snap.weekly_distances
                            .entry(uid.to_string())
                            .or_default()
                            .insert(wid.to_string(), r);
                    }
                }
                ["teams", tid] => {
                    if let Some(t) = decode(path, doc.clone()) {
                        snap.teams.insert(tid.to_string(), t);
                    }
                }
                _ => log::debug!("store: ignoring unknown path {path}"),
            }
        }
        snap.normalize();
        snap
    }

    /// Les, sjekk og skriv ukeposten under én og samme lås, slik at to
    /// samtidige innsendinger for samme uke ikke begge passerer sjekken.
    fn update_record<F>(&self, user_id: &str, week: WeekId, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(Option<WeeklyRecord>) -> Result<WeeklyRecord, StoreError>,
    {
        let path = weekly_key(user_id, &week.to_string());
        let mut docs = self.docs();

        let current = docs.get(&path).cloned().and_then(|doc| decode(&path, doc));
        let mut rec = apply(current)?;
        rec.week_id = week.to_string();

        let doc = serde_json::to_value(&rec).map_err(|e| StoreError::Encode(e.to_string()))?;
        docs.insert(path, doc);
        Ok(())
    }

    /// Mål-fasen: oppretter ukeposten. Mål kan bare settes én gang per uke.
    pub fn submit_goal(
        &self,
        user_id: &str,
        week: WeekId,
        distance: f64,
        reps: f64,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let (distance, reps) = match (clean_amount(Some(distance)), clean_amount(Some(reps))) {
            (Some(d), Some(r)) => (d, r),
            _ => return Err(StoreError::InvalidAmount),
        };

        self.update_record(user_id, week, |existing| {
            let mut rec = existing.unwrap_or_else(|| WeeklyRecord::new(week));
            if rec.has_goal() {
                return Err(StoreError::GoalAlreadySet(week.to_string()));
            }
            rec.goal_distance = Some(distance);
            rec.goal_reps = Some(reps);
            rec.timestamp = Some(at);
            Ok(rec)
        })?;

        log::info!("store: goal set for {user_id} {week}");
        Ok(())
    }

    /// Faktisk-fasen: krever at mål finnes, og kan bare gjøres én gang.
    pub fn submit_actual(
        &self,
        user_id: &str,
        week: WeekId,
        distance: f64,
        reps: f64,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let (distance, reps) = match (clean_amount(Some(distance)), clean_amount(Some(reps))) {
            (Some(d), Some(r)) => (d, r),
            _ => return Err(StoreError::InvalidAmount),
        };

        self.update_record(user_id, week, |existing| {
            let mut rec = match existing {
                Some(r) if r.has_goal() => r,
                _ => return Err(StoreError::NoGoal(week.to_string())),
            };
            if rec.has_any_actual() {
                return Err(StoreError::ActualAlreadySet(week.to_string()));
            }
            rec.actual_distance = Some(distance);
            rec.actual_reps = Some(reps);
            rec.timestamp = Some(at);
            Ok(rec)
        })?;

        log::info!("store: actuals set for {user_id} {week}");
        Ok(())
    }
}

impl RecordSource for MemoryStore {
    fn user_ids(&self) -> Vec<String> {
        self.query("user_names").into_iter().map(|(id, _)| id).collect()
    }

    fn profile(&self, user_id: &str) -> Option<UserProfile> {
        let path = profile_key(user_id);
        self.get(&path).and_then(|doc| decode(&path, doc))
    }

    fn weekly_records(&self, user_id: &str) -> Vec<WeeklyRecord> {
        let collection = format!("users/{user_id}/weekly_distances");
        self.query(&collection)
            .into_iter()
            .filter_map(|(wid, doc)| {
                let mut rec: WeeklyRecord = decode(&format!("{collection}/{wid}"), doc)?;
                if rec.week_id.is_empty() {
                    rec.week_id = wid;
                }
                Some(rec)
            })
            .collect()
    }

    fn teams(&self) -> Vec<(String, Team)> {
        self.query("teams")
            .into_iter()
            .filter_map(|(id, doc)| {
                let path = team_key(&id);
                decode(&path, doc).map(|t| (id, t))
            })
            .collect()
    }
}
