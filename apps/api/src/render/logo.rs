//! Letter logo: PNG bytes plus the pixel size needed to scale it in the page header.
//!
//! A PNG path can be configured; without one the bundled Violet logo is used.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// The bundled Violet logo (285x104 PNG), base64-encoded.
const BUNDLED_LOGO_BASE64: &str = concat!(
    "iVBORw0KGgoAAAANSUhEUgAAAR0AAABoCAYAAADM8iS9AAARs0lEQVR42u2debxWRRnHv6yXy2VxgRQEURRDQXEr",
    "FHBBQQmFLMrcyCVSQzHTMi0zl9wKCtdwLbVwTS0NRdyyUDBc0CQwyg3FNERAglC5/fE89+P19i4zc86c97y+z/fz",
    "OR8u75k5Z86cM7/ZnnmmVWNjI4ZhGFnR2rLAMAwTHcMwTHQMwzBMdAzDMNExDMMw0TEMw0THMAwTHcMwDBMdwzBM",
    "dAzDMEx0DMOoDtrGuOjZh8yp9XzdAxgMbK3C/grwDDAL+Mg+uyB2BUYCfwfutOzIjvNu3y3/olPjDAWOUNHZQkVn",
    "CbAd0BG4y7LIi87AEGCUis7DJjrW0jE+Lhy/BMYVOLedHkcA84DjteVjFG/V7A0MA4YDXZqde8eyx0THgK7As8CW",
    "jgXqaa29n7SsA8233VVg9gH6lgi7zLLLRMeABxwFpzmPAhsDq2swvzoBn9fu0nDtihomOoYjBwAhI211wA+BM2os",
    "v4YAf7Rvr3axKfPknJAg7rgazK9/muCY6BjJGJAgbl+gW43l11vAz+yzMdExwmmfMP8712Ce/dw+GxMdI5x/J4i7",
    "AryjBvNsCWIoaZjoGAHclyDuPGBdjebbhfbpmOgY2XcVzqvhfHsMWdJgmOgYniwDDgmIdwXweI3n3U/s8zHRMcK4",
    "AxgP/Ncx/GRgkmVboq6pYaJT8/wa2Aq4FFhc4PxSYDtiHPddyy4A2lkW1B5mpJUubwCn6LEN0BtoBfwLeBFYb1lk",
    "319GdATaAKvspdcOL+lhGFmyg3b1jwWeAr5gomMYRgz2Bk4GvtTst1xau5voGEZ1szPwI2BsgXOr8phgEx3DqE7q",
    "kVnQidWWcBMdw6g+DgSuBnpWY+JtytwwqoupwL3VKjjW0nGjDnejP8OIxYbA75CdRqoaE53/pxviOnMfxCtgN2BH",
    "0lkN3hbYBdgf6AecCKzMsFW7mT7PBohLjTZ6bq2mYxlixLjCPgNAHMI35VkXPnZj8h/gPcT+6jXi219thSyZ6Znh",
    "tzIGmQl7ArimGkTnQMRBVdIV1K2AD4DrImfwLsB+iL/eYdq6ac5JwJmB199CBazp6NHs3I8jik5nfZa9kBmOgS3u",
    "XYzViEX108Bc4CHE61+tiMwIYF+taPoj/pxLsRRxyv9nYAYwP+U0DdT30DGD598esfE5DOilv6XuCD+W6AwDvpfS",
    "tf4bQXT68PE+SkMcCuNoD9HpgthM7KsiM7BE2BhuLQ4EvqUtqC4B8RuAQXocq7/NRZZ53EhOp2ETshcwAfgi/k7V",
    "eugxGnHX8QwyyJtG66Cfin/7iM++IXCois3uLc6tBGZWi+icgezzNCaFa50TSdGneYTfVj/GVUVaY4O1pbSn1pCV",
    "8AY4AVlEukOEaw/W4zzgWm2hfRrEZ2/EOf4+KV5zZxWd0/Xb/XXgdbqq2McSnFFaOY0p0Zp7Xo/UuxaxODGl69wS",
    "IW33AS94hG+nTe2WTAZeR/avOldbN1kLznDEGdi1kQSnZa14una3vl7FYtOg+fVoyoLTchzmZmQ30pCu0eOa32mW",
    "7wHA+cAi4H7tRpXqPj6F+LSuGtF5HdnxMgl/AV6NlD5fz3WbFanVNqtg4fkp8AgyJlWKG5FBwf7IGNPOiFFZaNO5",
    "m3Z573YY88gbwxDnYRPKhFuEWPoORfY064vMHJ3tWWGNAxYAn/WIc01KFci7QAfgSGRs7q/AWchiZBdejPECYs9e",
    "nQYck7NWThP3AO97FJqGAr9N0heZNfXIBn97lgk3T/vqC1v8/ioy+PkLLVRTkZ1HfTlIP8wRVIcXwPHATQ7hzgIu",
    "KPD7y8iA8fnI1tCuXfQ+yADzIBWzUowGvpPS8+6GzK51D4y/MMZLiG0cuByYkiD+rRHTthZ40CN8qyI1weyMC05X",
    "7WeXE5zZwOccPpymcJcHpmdzTc92ORackxwFZ0wRwWnJ1cBOuE8G1OkYTanB/TYpf/M9EgjOWs8WXW5EB2Sg7oOA",
    "eLOQ6ciYPO0R9v0iv1+cYcFpA8wBti4TbqW2Pnw4GfhBYLo6aIHqlVPBOcJRVI/Hz5vhc8iYmk+FUaqim0J+tiSa",
    "T6TJgixEZ40Kjy8zMkibT591SZHf70OMxLLgYQoPaBcqPGsDrn+hYy1fiE7a9cgbO+E2g/QwYdPcTyDjPK4MprD5",
    "xcbAt1J+9hXIFP5C4BX9Tpcjxo3lDBqjbY2UlUXyZGSa1ed+o3WsISaLHcOto7RDrsv1+WJyPmJP4vJMSZroZyEm",
    "BWMD4vYBfqMtodzQGhlAdeHohO9mIrCph7hfD7zd7LdViAV8+xLds+vwG7ifi9hrNW8p1+lRr/eqR8YrG7Tr11Fb",
    "ZPOqXXQ+0oJwpEeckdqNWBwxXcuBxiLjNS0LcinL4WnaNamPlM7tVAxcuDqF+x2EbCK4UUDcw4EbtOVQaW5wfIY7",
    "SrRkXbkI8Y/tyiV8cpJlnUPr/gpP0WlToBz+R4/llawJsiJkoPKEyGlq1KMcz5Q5vwyxe4iFj4HZrSnly1cSxL+J",
    "yjMIOMox7GUp3O9G/CzMj8ZvkLdjARHJU/nOZaKeAv7hGecYh1ZIEhoc88BlcDHWIsn9dVzChb+lUGM38QiyqjmE",
    "nh4FPhbXOoZ7l3RmIFfgv1XyUdQgWSvhNM/wG2k/NxabO4ZzacXURUrjRR5hn0553klampXcvXQYYgbgwkzH1q4L",
    "j3mGP9pEJz43Brzgb0VMT3/Hj3Jlhd7Prh6tHJAp3DR5K0FXaXM+OYiZJT6zpWkK9Z88ww+gshbtNSE67+A/FT7C",
    "o0Xii4tB25UVfD/Heob/e4ULcEsqsT5rE2TxrStpTlQ8j5iI+LAXNUYlBpquCIgzIVJaPu/Q37+3gu/Hd9p6WYQ0",
    "vBbQbWhiP7LfxdN3AHxJivdeg4yr+bB7rYlOJTwHPoBMx/rsyTMBPwMs1xqx3Hqjqyr4bnYKaHrH6gZeiriB8KUr",
    "slwjy+lzny7dh2W6Vx306KrHBoitSyfEcriz/t2p2W+9PdPbz0QnG64Bvu8RvgfiNiLNj3dfys+MTfW4XshgZKn7",
    "Dw6saWMwA/Eo2BDYmsxKdOrwW5awXlve9cikxYYqHg0tjrqIae5JjVEp0bnCU3RABpTT/HgPKnN+umd3xdfZUqPW",
    "tMUYFPBMsXz1rkOmzw8PiLt9ht/V9p7C2J70/D6F0rXWRKdSxkNLEQdKPoxJ8QXVOYjOOZEFfD2lF8LukLP3GSr4",
    "AzP8rrapwjLYMXJLykSnGSGzQmnNhoyl9ADnTPxngtLuXoVMpdZHfF+zAuP1zrBQbVmFZbAbNbYrSyUf9rfIIjef",
    "pfzHAz9L4d7fLHP+OxV+L52QQUtfukRM0+sqxP0C0tSddGeJitEnIM5ETVu9HnXaReug/++oFVTTubZ6tNF/W2s3",
    "rWlJTfsSlfkHyPqn1s3+foF4Y3EmOgW4AT/jv22QgcmnEtxzU0oPNs6kMt4Am9OZML8qG0VO15MBotOasAHoED4T",
    "EOcx/Ke5jSrtXoG4y0y7lVKOk8ucPzEH76VN4LvpEzldoda7HTLKtxBx28NkoLZEZ1HAh3x4wo+4lKhMx39Rap6I",
    "PWj7cs6/s5D79DMZqC3RAX8DvPaEL5Q7ssy4xyk5eS+hCxA/Gzldod7k1mWUbyH3GWwyUHuic0vAxzIx8F6lHGFN",
    "QdaG5YEmR0t5a+mE5k9WA6UhPn2HEncA3sih6KxBVp/7sD3+Rmd7lGgJrEF2Jc0LKwjzz9ONMKNCV95DLJN9WIus",
    "YcuCpYFlYLhJQW2JDoTZ7Pj6einl3+VUSlsHZ836BK2KERHTtRr/9V1vq1hlQejGjMd+Sst3Yx4TlRfRmY/sgujD",
    "UbivYO5P8QWL/8TfuVgWhE7j7hMxTesDWjoLMsyz1wLjjSVsut2oYtEB/+nzBmSrXBdKbatyZE7fzfzAeCOJu57H",
    "133sCxnmWRJ7m3M+heW7Qx4TlSfRuTmgi3OKQ5gtgS8XOTcDMXjLI88FxmsHfDFSmtrgbwvzXIZ5tpDw8aNv4r6F",
    "TLWQywHyPInOCvwdge9Oea+CF1VpX342YTujNhWgGDQEtKKy9KXzUcL73Z7j76FVQCtzE3K4I0TeEhSyFUip6fNe",
    "wFeLnDuX7HbmDGEl7hvFtWQ34qy43gi/RaWzK5DHDyWIuwdwek6/h3UBlVB3cuiDOW+i8zj+BmhHlzh3bpHf36mS",
    "PvxtCeKeGyE9vt2P6RXIsztI5lfoEpLt+eXDL3HbHAAVnPcD7rGLiU55fHeo3AT4QpFauVj36RtV0ie/hXDDukMj",
    "jFH4rO1ap4Uqa5YDf0h4jduB8ZHT+WetMN/0iBMyXjXGRKc81wfEObXAb8VaMnMI30SuEk3qqQniX5dyenxqzUup",
    "nMuGC1K4xk3ATyOkbRfEi8FQZPLEx+7pzYD7HZa3cp5H0XkT/8HAEXxyi9bOFF/YeSjVxcUJugsHkO4WJ6McwzUC",
    "P65gns3VlkRSvqMCkcZsYE9kzHIest8V+G0XDWFbDNUnEOEt8HfDW5WiAzA5IE5zC+XvF3m2ywi3WnUpaL64zEas",
    "JNngZlozMlvivvTkVCq3QWHaXegBwD3aQp7k2cXsihge3oys0J/U7Nzb+HtjDBXSM/DbC2wbxE5sOhFsffLqJvEB",
    "7Ztv6BHn68D5WpC/XeD86iLdsLTwtTHyse6dAhxH2IzUZ4BbU2jhHecY7nmPLmHIota1juEWahcvrR1iB+vR1Fp5",
    "FnhFxaMpTR2AjZEZowHI1sadS3QBfSuqRxOkfyZi13ZZifsORMZBm8rPt2NUHnn2zToNONMjfB/ExedICvvknYjY",
    "ccTCdyuRVp61yChkyUYIX9VCckmCFvFJjq29UR7XDbGc3tgj7CnAgcBWKb/rXSm/Z1oplhNmHvIeYoYwNPC+U7Xi",
    "fRCxFF+FuGPdSq/ZfPPJDxDPntSS6FzjKTpojV7IWHAB4Xtyu7A1/h7o2mrrzLW//TKyg8U9gWm8WGutEG+NVyJ+",
    "m8sxEr+V3iHGmSOQWbm3HMPvhazJytNQwuEJ4k5NIDpo+XDZMXdarC5yXsd00KbrbM84+wPbFvj9iMhpDXVx6ms5",
    "/DuSWRtfhb990kG4regfh/8EQMi4S1v8/Cm9kbCQps2VOnwQyp1kY3B5dqwL51l0CKyVW3Izcdf/tCV8r/XN8NsG",
    "t6kGSrK3+48QO5a+DmHHA3c7hBsD3OWZjsMIdyR/nGf4OcAQsvNgWIyHHLup5TghcjonEdEdSd5F5zbCrDCb90sn",
    "Rk7jwY5dj2J8LyDO9chsxLLAe44GFmutuyefdBHSDnGPcYdDl3QB4jTsvoA0nJYgzzbBfxr7SWT2bUGFvuUHtfuZ",
    "BvcA90ZK5wPIDrzRyLvofIhY5YZyWkLRciHpWp3hhO1nPQvxhHhr4H1bqSD/Ubsg87VFuES7SQeXiT8FmaF5PuDe",
    "/Ulunv/dgDgvaZqvyvg7vjygRVuOsREEdC6FrftrSnRApj1DeFVfdkx2BHZK4TqhTe5l2k05gGR7gXVHtjEeRHln",
    "Vr/X506yIWEa09hDHbuIhThR4z8e+ftYrC2ykyNdf1fgiZSudS+yULg61SA6LwYq+vgM0nZpStc5k7AdPZuYgdiQ",
    "jNamd9puKt9Fxtd21kI0P8G1eqU4JvHzBHGfQGa29ouQZ4t0XKSfinQs1qh4JrH+fl9FcWxWBbpa9lA+ncIGf8V4",
    "DvhTBulaivuMTVsdLyn0cTdoYXwvYXru16M3MrU8SmtD3xbBhyosc/R6j+HvprQYPfS6q1PK/6TM0qO3CtBoxKiv",
    "t+d15mvL6W6SGfGF8EPgV8jM5jhk+YJLGbkFscX5d5aJbdXYmL7v5rMPmYORK7ZFDMB6IcZ1GyBrctoh1rSrEYO1",
    "t5A9y18ibHHhp4XWiHXu1sgMY3fEsrgDYkm+ViuItxEboEWEG27GYIi+897IDGE7bRUtQ0xRXsBjLO6823fLv+gY",
    "hmGUUnTDMAwTHcMwTHQMwzBMdAzDMNExDMMw0TEMw0THMAwTHcMwDBMdwzBMdAzDMEx0DMMw0TEMwzDRMQzDRMcw",
    "DBMdwzAMEx3DMKqd/wGbzBpjFnSrxAAAAABJRU5ErkJggg==",
);

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("failed to read logo file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("bundled logo is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("logo is not a PNG image")]
    NotPng,

    #[error("logo has zero width or height")]
    EmptyImage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logo {
    png: Bytes,
    width_px: u32,
    height_px: u32,
}

impl Logo {
    /// Validates the PNG signature and reads the pixel size from the IHDR chunk.
    pub fn from_png(png: impl Into<Bytes>) -> Result<Self, LogoError> {
        let png = png.into();
        // signature (8) + chunk length (4) + "IHDR" (4) + width (4) + height (4)
        if png.len() < 24 || png[..8] != PNG_SIGNATURE || &png[12..16] != b"IHDR" {
            return Err(LogoError::NotPng);
        }
        let width_px = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height_px = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        if width_px == 0 || height_px == 0 {
            return Err(LogoError::EmptyImage);
        }
        Ok(Self {
            png,
            width_px,
            height_px,
        })
    }

    pub fn bundled() -> Result<Self, LogoError> {
        let png = STANDARD.decode(BUNDLED_LOGO_BASE64)?;
        Self::from_png(png)
    }

    pub fn from_file(path: &Path) -> Result<Self, LogoError> {
        let png = std::fs::read(path).map_err(|source| LogoError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_png(png)
    }

    /// Loads the configured logo, or the bundled one when no path is set.
    ///
    /// A logo that cannot be loaded is logged and yields `None`; letters are then
    /// produced without a logo.
    pub fn resolve(path: Option<&Path>) -> Option<Self> {
        let loaded = match path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        };
        match loaded {
            Ok(logo) => {
                let (width, height) = logo.dimensions();
                info!("Letter logo loaded ({width}x{height}px)");
                Some(logo)
            }
            Err(e) => {
                warn!("Logo loading failed, letters will have no logo: {e}");
                None
            }
        }
    }

    pub fn png(&self) -> &Bytes {
        &self.png
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// Height that keeps the aspect ratio at the given width (any unit).
    pub fn scaled_height(&self, width: u64) -> u64 {
        width * u64::from(self.height_px) / u64::from(self.width_px)
    }

    /// `data:` URI for embedding in a self-contained HTML page.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}
