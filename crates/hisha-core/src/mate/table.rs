//! 証明数テーブル（PN-Table）
//!
//! ハッシュの添字から `WINDOW` 升の範囲を線形に探す。範囲が埋まっていたら
//! 証明・反証の確定していないエントリを全て消して（リセット）入れ直す。

use log::{info, warn};

use crate::tt::KEY_SHIFT;

use super::cn::Cn;

/// 1つの添字から探す升数
pub const WINDOW: usize = 17;

/// テーブルのエントリ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PnEntry {
    pub key: u64,
    pub pn: Cn,
    pub dn: Cn,
    /// 展開中の印（循環よけ）。リセットで消える
    pub provisional: bool,
}

impl PnEntry {
    /// 証明済み（pn = 0）または反証済み（dn = 0）
    #[inline]
    pub fn is_determined(&self) -> bool {
        !self.provisional && (self.pn.is_zero() || self.dn.is_zero())
    }
}

/// 証明数テーブル
///
/// 升数は `2^bits + WINDOW` で、どの添字の範囲も配列に収まる。
pub struct PnTable {
    slots: Vec<Option<PnEntry>>,
    mask: usize,
    resets: u64,
}

impl PnTable {
    pub fn new(bits: u32) -> Self {
        let len = 1usize << bits;
        Self {
            slots: vec![None; len + WINDOW],
            mask: len - 1,
            resets: 0,
        }
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key >> KEY_SHIFT) as usize & self.mask
    }

    #[inline]
    fn window(&self, key: u64) -> std::ops::Range<usize> {
        let start = self.index(key);
        start..start + WINDOW
    }

    /// 全升の数
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// 使用中の升数
    pub fn used(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// これまでのリセット回数
    pub fn resets(&self) -> u64 {
        self.resets
    }

    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.resets = 0;
    }

    /// エントリを探す
    pub fn get(&self, key: u64) -> Option<PnEntry> {
        self.slots[self.window(key)]
            .iter()
            .flatten()
            .find(|e| e.key == key)
            .copied()
    }

    /// 証明数・反証数を引く。見つからなければ (1, 1)
    pub fn lookup(&self, key: u64) -> (Cn, Cn) {
        self.get(key).map_or((Cn::ONE, Cn::ONE), |e| (e.pn, e.dn))
    }

    /// 結果を書き込む
    pub fn insert(&mut self, key: u64, pn: Cn, dn: Cn) {
        self.put(PnEntry { key, pn, dn, provisional: false });
    }

    /// 展開中の印を書き込む。引くと (∞, 0) に見える
    pub fn insert_provisional(&mut self, key: u64) {
        self.put(PnEntry {
            key,
            pn: Cn::INFINITE,
            dn: Cn::ZERO,
            provisional: true,
        });
    }

    /// エントリを消す（窓の探索は空き升で止まらないので穴が開いてもよい）
    pub fn remove(&mut self, key: u64) {
        let window = self.window(key);
        if let Some(slot) = self.slots[window].iter_mut().find(|s| s.is_some_and(|e| e.key == key)) {
            *slot = None;
        }
    }

    /// 展開中の印を全て消す
    pub fn drop_provisional(&mut self) -> usize {
        let mut dropped = 0;
        for slot in &mut self.slots {
            if slot.is_some_and(|e| e.provisional) {
                *slot = None;
                dropped += 1;
            }
        }
        dropped
    }

    fn put(&mut self, entry: PnEntry) {
        if let Some(i) = self.find_slot(entry.key) {
            self.slots[i] = Some(entry);
            return;
        }
        self.reset();
        match self.find_slot(entry.key) {
            Some(i) => self.slots[i] = Some(entry),
            None => {
                // 範囲が確定エントリだけで埋まっている
                let first = self.index(entry.key);
                warn!("pn table window at {first} saturated, overwriting its first slot");
                self.slots[first] = Some(entry);
            }
        }
    }

    /// 同じキーの升、なければ最初の空き升
    fn find_slot(&self, key: u64) -> Option<usize> {
        let window = self.window(key);
        let mut empty = None;
        for i in window {
            match self.slots[i] {
                Some(e) if e.key == key => return Some(i),
                None if empty.is_none() => empty = Some(i),
                _ => {}
            }
        }
        empty
    }

    /// 確定エントリ以外を全て消す
    fn reset(&mut self) {
        for slot in &mut self.slots {
            if slot.is_some_and(|e| !e.is_determined()) {
                *slot = None;
            }
        }
        self.resets += 1;
        info!("pn table reset #{}: {} entries kept", self.resets, self.used());
    }
}
