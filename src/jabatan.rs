// src/jabatan.rs
//
// Klasifikasi jabatan pengurus inti dari teks bebas. Satu-satunya tempat
// pencocokan substring dilakukan; semua pemanggil (filter proker, label,
// statistik) lewat sini.
use serde::Serialize;

use crate::models::anggota::Anggota;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeranInti {
    Ketua,
    WakilKetua,
    Sekretaris,
    Bendahara,
}

impl PeranInti {
    pub const SEMUA: [PeranInti; 4] = [
        PeranInti::Ketua,
        PeranInti::WakilKetua,
        PeranInti::Sekretaris,
        PeranInti::Bendahara,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PeranInti::Ketua => "Ketua",
            PeranInti::WakilKetua => "Wakil Ketua",
            PeranInti::Sekretaris => "Sekretaris",
            PeranInti::Bendahara => "Bendahara",
        }
    }

    /// Kunci pendek untuk id opsi filter di sisi klien.
    pub fn kunci(&self) -> &'static str {
        match self {
            PeranInti::Ketua => "ketua",
            PeranInti::WakilKetua => "wakil",
            PeranInti::Sekretaris => "sekretaris",
            PeranInti::Bendahara => "bendahara",
        }
    }

    pub fn dari_kunci(kunci: &str) -> Option<Self> {
        Self::SEMUA.into_iter().find(|p| p.kunci() == kunci)
    }
}

/// Peran turunan seorang anggota: salah satu dari empat jabatan inti,
/// pengurus inti tanpa klasifikasi, atau anggota divisi biasa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peran {
    Inti(PeranInti),
    PengurusLain,
    AnggotaDivisi,
}

impl Peran {
    pub fn label(&self) -> &'static str {
        match self {
            Peran::Inti(p) => p.label(),
            Peran::PengurusLain => "Pengurus Inti",
            Peran::AnggotaDivisi => "Anggota Divisi",
        }
    }
}

/// Cocokkan teks jabatan ke salah satu peran inti. "wakil" diperiksa lebih
/// dulu supaya jabatan yang memuat "wakil" sekaligus "ketua" jatuh ke
/// Wakil Ketua, bukan Ketua.
pub fn klasifikasi_jabatan(jabatan: &str) -> Option<PeranInti> {
    let j = jabatan.to_lowercase();
    if j.contains("wakil") {
        Some(PeranInti::WakilKetua)
    } else if j.contains("ketua") {
        Some(PeranInti::Ketua)
    } else if j.contains("sekretaris") {
        Some(PeranInti::Sekretaris)
    } else if j.contains("bendahara") {
        Some(PeranInti::Bendahara)
    } else {
        None
    }
}

pub fn peran_anggota(anggota: &Anggota) -> Peran {
    if anggota.divisi_id.is_some() {
        Peran::AnggotaDivisi
    } else {
        klasifikasi_jabatan(&anggota.jabatan)
            .map(Peran::Inti)
            .unwrap_or(Peran::PengurusLain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn klasifikasi_jabatan_inti() {
        assert_eq!(
            klasifikasi_jabatan("Wakil Ketua Umum"),
            Some(PeranInti::WakilKetua)
        );
        assert_eq!(klasifikasi_jabatan("Ketua Umum"), Some(PeranInti::Ketua));
        assert_eq!(
            klasifikasi_jabatan("Sekretaris I"),
            Some(PeranInti::Sekretaris)
        );
        assert_eq!(
            klasifikasi_jabatan("Bendahara"),
            Some(PeranInti::Bendahara)
        );
        assert_eq!(klasifikasi_jabatan("Staff Ahli"), None);
    }

    #[test]
    fn wakil_menang_atas_ketua() {
        // jabatan yang memuat kedua kata wajib jatuh ke Wakil Ketua
        assert_eq!(
            klasifikasi_jabatan("Wakil Ketua"),
            Some(PeranInti::WakilKetua)
        );
        assert_eq!(
            klasifikasi_jabatan("KETUA sekaligus WAKIL"),
            Some(PeranInti::WakilKetua)
        );
    }

    #[test]
    fn klasifikasi_tidak_peka_huruf() {
        assert_eq!(klasifikasi_jabatan("BENDAHARA II"), Some(PeranInti::Bendahara));
        assert_eq!(klasifikasi_jabatan("sekretaris umum"), Some(PeranInti::Sekretaris));
    }

    #[test]
    fn klasifikasi_deterministik() {
        for jabatan in ["Ketua Umum", "Wakil Ketua", "Staff Ahli", ""] {
            assert_eq!(klasifikasi_jabatan(jabatan), klasifikasi_jabatan(jabatan));
        }
    }

    #[test]
    fn peran_anggota_membedakan_divisi_dan_inti() {
        use chrono::Utc;
        let mut a = Anggota {
            id: "a1".into(),
            nama: "Contoh".into(),
            jabatan: "Ketua Umum".into(),
            angkatan: 2023,
            divisi_id: None,
            foto_url: None,
            email: None,
            telepon: None,
            bio: None,
            urutan: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(peran_anggota(&a), Peran::Inti(PeranInti::Ketua));

        a.jabatan = "Staff Ahli".into();
        assert_eq!(peran_anggota(&a), Peran::PengurusLain);
        assert_eq!(peran_anggota(&a).label(), "Pengurus Inti");

        a.divisi_id = Some("d1".into());
        assert_eq!(peran_anggota(&a), Peran::AnggotaDivisi);
    }

    #[test]
    fn kunci_bolak_balik() {
        for p in PeranInti::SEMUA {
            assert_eq!(PeranInti::dari_kunci(p.kunci()), Some(p));
        }
        assert_eq!(PeranInti::dari_kunci("staff"), None);
    }
}
