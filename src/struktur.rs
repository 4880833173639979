// src/struktur.rs
//
// Penyusun hierarki organisasi: tiga daftar datar (bidang, divisi, anggota)
// yang sudah terurut menurut `urutan` menjadi satu pohon baca
// bidang -> divisi -> anggota. Fungsi murni; tidak menyentuh database.
use std::collections::HashMap;

use serde::Serialize;

use crate::models::anggota::Anggota;
use crate::models::bidang::Bidang;
use crate::models::divisi::Divisi;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisiAnggota {
    #[serde(flatten)]
    pub divisi: Divisi,
    pub anggota: Vec<Anggota>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrukturBidang {
    pub bidang: Bidang,
    pub kepala_bidang: Option<Anggota>,
    pub divisi: Vec<DivisiAnggota>,
}

/// Kelompokkan divisi per bidang dan anggota per divisi, mempertahankan
/// urutan relatif masing-masing daftar masukan. Bidang tanpa divisi tetap
/// muncul dengan daftar kosong. Anggota tanpa divisi tidak pernah masuk ke
/// pohon ini; ambil lewat [`pengurus_inti`].
pub fn susun_struktur(
    bidang_list: Vec<Bidang>,
    divisi_list: Vec<Divisi>,
    anggota_list: Vec<Anggota>,
) -> Vec<StrukturBidang> {
    let mut kepala: HashMap<String, Anggota> = HashMap::new();
    for b in &bidang_list {
        if let Some(kepala_id) = &b.kepala_bidang_id {
            if let Some(a) = anggota_list.iter().find(|a| &a.id == kepala_id) {
                kepala.insert(b.id.clone(), a.clone());
            }
        }
    }

    let mut anggota_per_divisi: HashMap<String, Vec<Anggota>> = HashMap::new();
    for a in anggota_list {
        if let Some(divisi_id) = a.divisi_id.clone() {
            anggota_per_divisi.entry(divisi_id).or_default().push(a);
        }
    }

    let mut divisi_per_bidang: HashMap<String, Vec<DivisiAnggota>> = HashMap::new();
    for d in divisi_list {
        let anggota = anggota_per_divisi.remove(&d.id).unwrap_or_default();
        divisi_per_bidang
            .entry(d.bidang_id.clone())
            .or_default()
            .push(DivisiAnggota { divisi: d, anggota });
    }

    bidang_list
        .into_iter()
        .map(|b| {
            let divisi = divisi_per_bidang.remove(&b.id).unwrap_or_default();
            let kepala_bidang = kepala.remove(&b.id);
            StrukturBidang {
                bidang: b,
                kepala_bidang,
                divisi,
            }
        })
        .collect()
}

/// Anggota tanpa referensi divisi, urutan masukan dipertahankan.
pub fn pengurus_inti(anggota_list: &[Anggota]) -> Vec<Anggota> {
    anggota_list
        .iter()
        .filter(|a| a.divisi_id.is_none())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bidang(id: &str, urutan: i32) -> Bidang {
        Bidang {
            id: id.into(),
            nama: format!("Bidang {id}"),
            deskripsi: None,
            kepala_bidang_id: None,
            urutan,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn divisi(id: &str, bidang_id: &str, urutan: i32) -> Divisi {
        Divisi {
            id: id.into(),
            bidang_id: bidang_id.into(),
            nama: format!("Divisi {id}"),
            deskripsi: None,
            urutan,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn anggota(id: &str, divisi_id: Option<&str>, urutan: i32) -> Anggota {
        Anggota {
            id: id.into(),
            nama: format!("Anggota {id}"),
            jabatan: "Staff".into(),
            angkatan: 2023,
            divisi_id: divisi_id.map(Into::into),
            foto_url: None,
            email: None,
            telepon: None,
            bio: None,
            urutan,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn contoh() -> (Vec<Bidang>, Vec<Divisi>, Vec<Anggota>) {
        let bidang_list = vec![bidang("b1", 1), bidang("b2", 2), bidang("b3", 3)];
        let divisi_list = vec![
            divisi("d1", "b1", 1),
            divisi("d2", "b2", 1),
            divisi("d3", "b1", 2),
        ];
        let anggota_list = vec![
            anggota("a1", None, 1),
            anggota("a2", Some("d1"), 2),
            anggota("a3", Some("d3"), 3),
            anggota("a4", Some("d1"), 4),
            anggota("a5", None, 5),
            anggota("a6", Some("d2"), 6),
        ];
        (bidang_list, divisi_list, anggota_list)
    }

    fn tripel(struktur: &[StrukturBidang]) -> Vec<(String, String, String)> {
        let mut out = Vec::new();
        for s in struktur {
            for d in &s.divisi {
                for a in &d.anggota {
                    out.push((s.bidang.id.clone(), d.divisi.id.clone(), a.id.clone()));
                }
            }
        }
        out
    }

    #[test]
    fn pengelompokan_tanpa_kehilangan_dan_duplikasi() {
        let (b, d, a) = contoh();
        let struktur = susun_struktur(b, d, a);

        let mut hasil = tripel(&struktur);
        hasil.sort();
        let mut harapan = vec![
            ("b1".to_string(), "d1".to_string(), "a2".to_string()),
            ("b1".to_string(), "d1".to_string(), "a4".to_string()),
            ("b1".to_string(), "d3".to_string(), "a3".to_string()),
            ("b2".to_string(), "d2".to_string(), "a6".to_string()),
        ];
        harapan.sort();
        assert_eq!(hasil, harapan);
    }

    #[test]
    fn pengurus_inti_dan_pohon_mempartisi_anggota() {
        let (b, d, a) = contoh();
        let inti = pengurus_inti(&a);
        let struktur = susun_struktur(b, d, a.clone());

        let di_pohon: Vec<String> = tripel(&struktur).into_iter().map(|(_, _, id)| id).collect();
        let di_inti: Vec<String> = inti.iter().map(|x| x.id.clone()).collect();

        // irisan kosong
        assert!(di_inti.iter().all(|id| !di_pohon.contains(id)));
        // gabungan menutup seluruh daftar
        let mut gabungan: Vec<String> = di_pohon.into_iter().chain(di_inti).collect();
        gabungan.sort();
        let mut semua: Vec<String> = a.iter().map(|x| x.id.clone()).collect();
        semua.sort();
        assert_eq!(gabungan, semua);
    }

    #[test]
    fn bidang_kosong_tetap_muncul() {
        let (b, d, a) = contoh();
        let struktur = susun_struktur(b, d, a);
        let b3 = struktur.iter().find(|s| s.bidang.id == "b3").unwrap();
        assert!(b3.divisi.is_empty());
    }

    #[test]
    fn urutan_relatif_dipertahankan() {
        let (b, d, a) = contoh();
        let struktur = susun_struktur(b, d, a);

        let ids_bidang: Vec<&str> = struktur.iter().map(|s| s.bidang.id.as_str()).collect();
        assert_eq!(ids_bidang, ["b1", "b2", "b3"]);

        let b1 = &struktur[0];
        let ids_divisi: Vec<&str> = b1.divisi.iter().map(|d| d.divisi.id.as_str()).collect();
        assert_eq!(ids_divisi, ["d1", "d3"]);

        let d1 = &b1.divisi[0];
        let ids_anggota: Vec<&str> = d1.anggota.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids_anggota, ["a2", "a4"]);
    }

    #[test]
    fn penyusunan_idempoten() {
        let (b, d, a) = contoh();
        let sekali = susun_struktur(b.clone(), d.clone(), a.clone());
        let dua_kali = susun_struktur(b, d, a);
        assert_eq!(sekali, dua_kali);
    }

    #[test]
    fn kepala_bidang_terselesaikan_dari_daftar_anggota() {
        let (mut b, d, a) = contoh();
        b[0].kepala_bidang_id = Some("a1".into());
        b[1].kepala_bidang_id = Some("tidak-ada".into());
        let struktur = susun_struktur(b, d, a);
        assert_eq!(
            struktur[0].kepala_bidang.as_ref().map(|k| k.id.as_str()),
            Some("a1")
        );
        assert!(struktur[1].kepala_bidang.is_none());
    }
}
